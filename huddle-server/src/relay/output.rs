use async_trait::async_trait;
use huddle_core::{ConnectionId, ServerMessage};

/// Transport seam between the coordinators and whatever owns the sockets.
/// Delivery is fire-and-forget: a missing or closed connection drops the
/// message, it is never queued.
#[async_trait]
pub trait SignalingOutput: Send + Sync {
    async fn deliver(&self, conn: ConnectionId, msg: ServerMessage);
}
