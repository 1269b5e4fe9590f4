mod coordinator;
mod session;

pub use coordinator::CallCoordinator;
pub use session::{CallSession, CallState};
