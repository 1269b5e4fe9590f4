use crate::link::LinkState;
use async_trait::async_trait;
use huddle_core::MediaType;
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum PeerError {
    #[error("negotiation failed: {0}")]
    Negotiation(String),

    #[error("media device unavailable: {0}")]
    Media(String),

    #[error("link to {0} is closed")]
    LinkClosed(String),

    #[error("cannot {action} while {state:?}")]
    InvalidTransition {
        action: &'static str,
        state: LinkState,
    },
}

/// Opaque handle to one local capture track.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub struct TrackId(pub Uuid);

impl TrackId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TrackId {
    fn default() -> Self {
        Self::new()
    }
}

/// Locally captured media, acquired once and fed to every outgoing link.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct LocalMedia {
    pub audio: TrackId,
    pub video: Option<TrackId>,
}

/// One platform peer connection. Implementations wrap the browser or native
/// RTC stack; negotiation payloads stay opaque on both sides of this trait.
#[async_trait]
pub trait PeerConnectionDriver: Send + Sync {
    async fn create_offer(&self, media: &LocalMedia) -> Result<Value, PeerError>;

    /// Apply a remote offer and produce the local answer.
    async fn apply_remote_offer(&self, media: &LocalMedia, offer: Value)
    -> Result<Value, PeerError>;

    async fn apply_remote_answer(&self, answer: Value) -> Result<(), PeerError>;

    async fn add_ice_candidate(&self, candidate: Value) -> Result<(), PeerError>;

    /// Swap the outgoing video track in place, without renegotiation.
    async fn replace_video_track(&self, track: TrackId) -> Result<(), PeerError>;

    async fn close(&self);
}

/// Local capture devices: camera, microphone, screen.
#[async_trait]
pub trait MediaDevices: Send + Sync {
    async fn acquire(&self, media_type: MediaType) -> Result<LocalMedia, PeerError>;

    async fn acquire_screen(&self) -> Result<TrackId, PeerError>;

    async fn release(&self, media: LocalMedia);
}
