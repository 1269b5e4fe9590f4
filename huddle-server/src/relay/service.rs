use crate::relay::SignalingOutput;
use async_trait::async_trait;
use dashmap::DashMap;
use huddle_core::{ConnectionId, ServerMessage};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::warn;

/// Registry of live connection senders. Serialization to the socket happens
/// in each connection's writer task, so delivery here never touches I/O.
#[derive(Clone, Default)]
pub struct SignalingService {
    connections: Arc<DashMap<ConnectionId, mpsc::UnboundedSender<ServerMessage>>>,
}

impl SignalingService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_connection(&self, conn: ConnectionId, tx: mpsc::UnboundedSender<ServerMessage>) {
        self.connections.insert(conn, tx);
    }

    pub fn remove_connection(&self, conn: &ConnectionId) {
        self.connections.remove(conn);
    }
}

#[async_trait]
impl SignalingOutput for SignalingService {
    async fn deliver(&self, conn: ConnectionId, msg: ServerMessage) {
        match self.connections.get(&conn) {
            Some(tx) => {
                if tx.send(msg).is_err() {
                    warn!(%conn, "writer task gone, dropping message");
                }
            }
            None => warn!(%conn, "no live connection, dropping message"),
        }
    }
}
