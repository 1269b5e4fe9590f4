use crate::calls::CallCoordinator;
use crate::config::ServerConfig;
use crate::presence::PresenceRegistry;
use crate::relay::{SignalingRelay, SignalingService};
use crate::rooms::RoomManager;
use huddle_core::{ConnectionId, IceServerConfig};
use std::sync::Arc;
use tracing::info;

/// Shared server state handed to every connection handler.
#[derive(Clone)]
pub struct AppState {
    pub service: SignalingService,
    pub presence: Arc<PresenceRegistry>,
    pub relay: Arc<SignalingRelay>,
    pub calls: CallCoordinator,
    pub rooms: RoomManager,
    pub ice_servers: Vec<IceServerConfig>,
}

impl AppState {
    pub fn new(config: &ServerConfig) -> Self {
        let service = SignalingService::new();
        let presence = Arc::new(PresenceRegistry::new());
        let relay = Arc::new(SignalingRelay::new(
            presence.clone(),
            Arc::new(service.clone()),
        ));
        let calls = CallCoordinator::new(relay.clone(), config.ring_timeout);
        let rooms = RoomManager::new(relay.clone());

        Self {
            service,
            presence,
            relay,
            calls,
            rooms,
            ice_servers: config.ice_servers.clone(),
        }
    }

    /// Single teardown funnel for a closed connection. Presence goes first;
    /// dependent call and room state follows only when this was the
    /// identity's last live connection.
    pub async fn disconnect(&self, conn: ConnectionId) {
        self.service.remove_connection(&conn);

        let Some(departure) = self.presence.unregister(&conn) else {
            return;
        };
        if !departure.last_connection {
            return;
        }

        let identity = departure.identity;
        info!(%identity, "last connection closed, tearing down sessions");
        self.calls.on_disconnect(&identity).await;
        self.rooms.on_disconnect(&identity).await;
    }
}
