pub mod relay_tests;

use huddle_server::{AppState, ServerConfig};
use std::net::SocketAddr;
use std::time::Duration;
use tracing::Level;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_test_writer()
        .try_init();
}

pub fn create_test_app() -> AppState {
    create_test_app_with_ring_timeout(Duration::from_secs(30))
}

pub fn create_test_app_with_ring_timeout(ring_timeout: Duration) -> AppState {
    let config = ServerConfig {
        bind: SocketAddr::from(([127, 0, 0, 1], 0)),
        ice_servers: vec![],
        ring_timeout,
    };
    AppState::new(&config)
}
