//! Client-side peer orchestration: one peer connection per remote
//! participant, driven by relayed signaling events. The platform RTC stack
//! sits behind [`PeerConnectionDriver`] so the state machine itself never
//! sees SDP contents and runs on any target.

pub mod driver;
pub mod link;
pub mod manager;

pub use driver::{LocalMedia, MediaDevices, PeerConnectionDriver, PeerError, TrackId};
pub use link::{LinkState, PeerLink};
pub use manager::{PeerManager, SignalSink};
