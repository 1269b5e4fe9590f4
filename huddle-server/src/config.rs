use huddle_core::IceServerConfig;
use std::env;
use std::net::SocketAddr;
use std::time::Duration;

const DEFAULT_RING_TIMEOUT: Duration = Duration::from_secs(30);

/// Runtime configuration, read from the environment like the rest of the
/// deployment stack.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    /// STUN/TURN addresses forwarded to clients at registration.
    pub ice_servers: Vec<IceServerConfig>,
    /// How long an unanswered invite may ring before the server ends it.
    pub ring_timeout: Duration,
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let bind = match env::var("HUDDLE_BIND") {
            Ok(v) => v.parse()?,
            Err(_) => SocketAddr::from(([0, 0, 0, 0], 3000)),
        };

        let mut ice_servers = Vec::new();
        if let Ok(url) = env::var("HUDDLE_STUN_URL") {
            ice_servers.push(IceServerConfig {
                urls: vec![url],
                username: None,
                credential: None,
            });
        }
        if let Ok(url) = env::var("HUDDLE_TURN_URL") {
            ice_servers.push(IceServerConfig {
                urls: vec![url],
                username: env::var("HUDDLE_TURN_USERNAME").ok(),
                credential: env::var("HUDDLE_TURN_CREDENTIAL").ok(),
            });
        }

        let ring_timeout = match env::var("HUDDLE_RING_TIMEOUT_SECS") {
            Ok(v) => Duration::from_secs(v.parse()?),
            Err(_) => DEFAULT_RING_TIMEOUT,
        };

        Ok(Self {
            bind,
            ice_servers,
            ring_timeout,
        })
    }
}
