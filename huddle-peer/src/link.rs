use crate::driver::{LocalMedia, PeerConnectionDriver, PeerError, TrackId};
use huddle_core::UserId;
use serde_json::Value;
use tracing::debug;

/// Negotiation lifecycle of one peer link.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum LinkState {
    New,
    /// We sent the offer and wait for the answer.
    NegotiatingLocal,
    /// The remote sent the offer; we produced the answer.
    NegotiatingRemote,
    Connected,
    Closed,
}

/// One peer connection toward one remote participant. Transition guards make
/// teardown idempotent regardless of message arrival order.
pub struct PeerLink {
    remote: UserId,
    state: LinkState,
    driver: Box<dyn PeerConnectionDriver>,
}

impl PeerLink {
    pub fn new(remote: UserId, driver: Box<dyn PeerConnectionDriver>) -> Self {
        Self {
            remote,
            state: LinkState::New,
            driver,
        }
    }

    pub fn remote(&self) -> &UserId {
        &self.remote
    }

    pub fn state(&self) -> LinkState {
        self.state
    }

    /// Offerer side: produce the local offer.
    pub async fn start_offer(&mut self, media: &LocalMedia) -> Result<Value, PeerError> {
        self.guard(LinkState::New, "offer")?;
        let offer = self.driver.create_offer(media).await?;
        self.state = LinkState::NegotiatingLocal;
        Ok(offer)
    }

    /// Answerer side: apply the remote offer and produce the answer. The
    /// signaling exchange is complete once the answer is out.
    pub async fn answer_offer(
        &mut self,
        media: &LocalMedia,
        offer: Value,
    ) -> Result<Value, PeerError> {
        self.guard(LinkState::New, "answer an offer")?;
        self.state = LinkState::NegotiatingRemote;
        let answer = self.driver.apply_remote_offer(media, offer).await?;
        self.state = LinkState::Connected;
        Ok(answer)
    }

    /// Offerer side: the remote answered.
    pub async fn complete(&mut self, answer: Value) -> Result<(), PeerError> {
        self.guard(LinkState::NegotiatingLocal, "apply an answer")?;
        self.driver.apply_remote_answer(answer).await?;
        self.state = LinkState::Connected;
        Ok(())
    }

    /// Candidates for a link that is not negotiating are dropped, never an
    /// error: trickled ICE routinely outlives the link it was meant for.
    pub async fn add_ice_candidate(&mut self, candidate: Value) -> Result<(), PeerError> {
        if matches!(self.state, LinkState::New | LinkState::Closed) {
            debug!(remote = %self.remote, state = ?self.state, "candidate dropped");
            return Ok(());
        }
        self.driver.add_ice_candidate(candidate).await
    }

    pub async fn replace_video_track(&mut self, track: TrackId) -> Result<(), PeerError> {
        if self.state == LinkState::Closed {
            return Err(PeerError::LinkClosed(self.remote.to_string()));
        }
        self.driver.replace_video_track(track).await
    }

    /// Idempotent: closing a closed link is a no-op.
    pub async fn close(&mut self) {
        if self.state == LinkState::Closed {
            return;
        }
        self.state = LinkState::Closed;
        self.driver.close().await;
    }

    fn guard(&self, expected: LinkState, action: &'static str) -> Result<(), PeerError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(PeerError::InvalidTransition {
                action,
                state: self.state,
            })
        }
    }
}
