use crate::presence::PresenceRegistry;
use crate::relay::SignalingOutput;
use huddle_core::{ConnectionId, ServerMessage, UserId};
use std::sync::Arc;

/// Content-blind fan-out: resolves an identity to its live connections and
/// forwards messages through the transport seam. Payloads pass through as
/// opaque values; nothing here inspects them.
pub struct SignalingRelay {
    presence: Arc<PresenceRegistry>,
    output: Arc<dyn SignalingOutput>,
}

impl SignalingRelay {
    pub fn new(presence: Arc<PresenceRegistry>, output: Arc<dyn SignalingOutput>) -> Self {
        Self { presence, output }
    }

    pub async fn to_connection(&self, conn: ConnectionId, msg: ServerMessage) {
        self.output.deliver(conn, msg).await;
    }

    /// Deliver to every live connection of an identity. Returns how many
    /// connections were addressed; zero means the target is offline.
    pub async fn to_identity(&self, identity: &UserId, msg: &ServerMessage) -> usize {
        let conns = self.presence.resolve(identity);
        for conn in &conns {
            self.output.deliver(*conn, msg.clone()).await;
        }
        conns.len()
    }

    pub async fn to_each<'a, I>(&self, identities: I, msg: &ServerMessage)
    where
        I: IntoIterator<Item = &'a UserId>,
    {
        for identity in identities {
            self.to_identity(identity, msg).await;
        }
    }
}
