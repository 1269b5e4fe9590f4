mod call;
mod identity;
mod room;
mod signaling;

pub use call::{CallId, EndReason, MediaType, UnavailableReason};
pub use identity::{ConnectionId, UserId};
pub use room::RoomCode;
pub use signaling::{ClientMessage, IceServerConfig, ServerMessage};
