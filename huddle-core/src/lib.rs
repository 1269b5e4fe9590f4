pub mod error;
pub mod model;

pub use error::{ErrorCode, SignalingError};
pub use model::{
    CallId, ClientMessage, ConnectionId, EndReason, IceServerConfig, MediaType, RoomCode,
    ServerMessage, UnavailableReason, UserId,
};
