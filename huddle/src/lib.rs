pub use huddle_core::model::UserId;

pub mod model {
    pub use huddle_core::model::*;
}

pub mod error {
    pub use huddle_core::error::*;
}

#[cfg(feature = "server")]
pub mod server {
    pub use huddle_server::*;
}

#[cfg(feature = "peer")]
pub mod peer {
    pub use huddle_peer::*;
}
