mod app;
pub mod calls;
pub mod config;
pub mod dispatch;
pub mod presence;
pub mod relay;
pub mod rooms;
pub mod ws;

pub use app::AppState;
pub use calls::{CallCoordinator, CallSession, CallState};
pub use config::ServerConfig;
pub use presence::{Departure, PresenceRegistry};
pub use relay::{SignalingOutput, SignalingRelay, SignalingService};
pub use rooms::{RoomCommand, RoomManager};
pub use ws::ws_handler;
