use crate::driver::{LocalMedia, MediaDevices, PeerConnectionDriver, PeerError, TrackId};
use crate::link::{LinkState, PeerLink};
use async_trait::async_trait;
use huddle_core::{ClientMessage, MediaType, RoomCode, ServerMessage, UserId};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Outbound channel back to the signaling server.
#[async_trait]
pub trait SignalSink: Send + Sync {
    async fn send(&self, msg: ClientMessage);
}

/// Client-side orchestration: one peer link per remote participant in the
/// current call or room, local media lifecycle, and screen-share swaps.
///
/// For a room of size N the relayed event stream leaves this manager holding
/// exactly N-1 links: the joiner offers to everyone in its bootstrap
/// snapshot, and every existing member answers the offer that follows the
/// `memberJoined` announcement.
pub struct PeerManager {
    links: HashMap<UserId, PeerLink>,
    driver_factory: Arc<dyn Fn() -> Box<dyn PeerConnectionDriver> + Send + Sync>,
    devices: Arc<dyn MediaDevices>,
    sink: Arc<dyn SignalSink>,
    local_media: Option<LocalMedia>,
    screen_track: Option<TrackId>,
}

impl PeerManager {
    pub fn new<F>(driver_factory: F, devices: Arc<dyn MediaDevices>, sink: Arc<dyn SignalSink>) -> Self
    where
        F: Fn() -> Box<dyn PeerConnectionDriver> + Send + Sync + 'static,
    {
        Self {
            links: HashMap::new(),
            driver_factory: Arc::new(driver_factory),
            devices,
            sink,
            local_media: None,
            screen_track: None,
        }
    }

    /// Grab local capture once, before any negotiation starts.
    pub async fn acquire_media(&mut self, media_type: MediaType) -> Result<(), PeerError> {
        if self.local_media.is_none() {
            self.local_media = Some(self.devices.acquire(media_type).await?);
        }
        Ok(())
    }

    /// Place a 1:1 call.
    pub async fn start_call(&mut self, to: UserId, media_type: MediaType) -> Result<(), PeerError> {
        self.acquire_media(media_type).await?;
        let media = self.media()?.clone();

        let link = self.ensure_link(to.clone());
        let offer = link.start_offer(&media).await?;

        self.sink
            .send(ClientMessage::CallUser {
                to,
                media_type,
                offer,
            })
            .await;
        Ok(())
    }

    /// Accept a ringing 1:1 call.
    pub async fn accept_call(
        &mut self,
        from: UserId,
        media_type: MediaType,
        offer: Value,
    ) -> Result<(), PeerError> {
        self.acquire_media(media_type).await?;
        let media = self.media()?.clone();

        let link = self.ensure_link(from);
        let answer = link.answer_offer(&media, offer).await?;

        self.sink.send(ClientMessage::AnswerCall { answer }).await;
        Ok(())
    }

    /// Hang up: tell the server, then tear everything down locally.
    pub async fn end_call(&mut self) {
        self.sink.send(ClientMessage::EndCall).await;
        self.close_all().await;
    }

    pub async fn join_room(&mut self, room: RoomCode, media_type: MediaType) -> Result<(), PeerError> {
        self.acquire_media(media_type).await?;
        self.sink.send(ClientMessage::JoinRoom { room }).await;
        Ok(())
    }

    pub async fn leave_room(&mut self, room: RoomCode) {
        self.sink.send(ClientMessage::LeaveRoom { room }).await;
        self.close_all().await;
    }

    /// React to one relayed server event. Unknown or stale events are inert.
    pub async fn handle_event(&mut self, event: ServerMessage) -> Result<(), PeerError> {
        match event {
            ServerMessage::ExistingMembers { members, .. } => {
                // the joiner is always the offerer toward the snapshot
                for member in members {
                    self.offer_to(member).await?;
                }
                Ok(())
            }
            // the joiner's offer will arrive on its own
            ServerMessage::MemberJoined { .. } => Ok(()),
            ServerMessage::Offer { from, payload } => self.answer_to(from, payload).await,
            ServerMessage::Answer { from, payload } => self.complete_link(&from, payload).await,
            ServerMessage::CallAccepted { from, answer } => self.complete_link(&from, answer).await,
            ServerMessage::IceCandidate { from, candidate } => match self.links.get_mut(&from) {
                Some(link) => link.add_ice_candidate(candidate).await,
                None => {
                    debug!(%from, "candidate for unknown link dropped");
                    Ok(())
                }
            },
            ServerMessage::MemberLeft { member, .. } => {
                self.close_link(&member).await;
                Ok(())
            }
            ServerMessage::CallCancelled { from } => {
                self.close_link(&from).await;
                Ok(())
            }
            ServerMessage::CallEnded { from, .. } => {
                self.close_link(&from).await;
                Ok(())
            }
            ServerMessage::CallUnavailable { to, .. } => {
                self.close_link(&to).await;
                Ok(())
            }
            // ringing is surfaced to the UI; answering is an explicit
            // `accept_call` once the user picks up
            ServerMessage::IncomingCall { .. } => Ok(()),
            _ => Ok(()),
        }
    }

    /// Swap every outgoing video track for the screen capture. Track
    /// substitution only: the coordinators never hear about it.
    pub async fn start_screen_share(&mut self) -> Result<(), PeerError> {
        let track = self.devices.acquire_screen().await?;
        self.swap_video(track).await?;
        self.screen_track = Some(track);
        Ok(())
    }

    /// Swap the camera track back in. A no-op when nothing is being shared.
    pub async fn stop_screen_share(&mut self) -> Result<(), PeerError> {
        if self.screen_track.take().is_none() {
            return Ok(());
        }
        let Some(camera) = self.local_media.as_ref().and_then(|m| m.video) else {
            return Ok(());
        };
        self.swap_video(camera).await
    }

    /// Close every link and release local capture.
    pub async fn close_all(&mut self) {
        for (_, mut link) in self.links.drain() {
            link.close().await;
        }
        self.release_media().await;
    }

    /// Stop local capture; safe to call twice.
    pub async fn release_media(&mut self) {
        if let Some(media) = self.local_media.take() {
            self.devices.release(media).await;
        }
        self.screen_track = None;
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    pub fn link_state(&self, remote: &UserId) -> Option<LinkState> {
        self.links.get(remote).map(|link| link.state())
    }

    async fn offer_to(&mut self, remote: UserId) -> Result<(), PeerError> {
        let media = self.media()?.clone();
        let link = self.ensure_link(remote.clone());
        if link.state() != LinkState::New {
            debug!(%remote, state = ?link.state(), "link already negotiating, not offering");
            return Ok(());
        }
        let offer = link.start_offer(&media).await?;
        self.sink
            .send(ClientMessage::Offer {
                to: remote,
                payload: offer,
            })
            .await;
        Ok(())
    }

    async fn answer_to(&mut self, remote: UserId, offer: Value) -> Result<(), PeerError> {
        let media = self.media()?.clone();
        let link = self.ensure_link(remote.clone());
        let answer = link.answer_offer(&media, offer).await?;
        self.sink
            .send(ClientMessage::Answer {
                to: remote,
                payload: answer,
            })
            .await;
        Ok(())
    }

    async fn complete_link(&mut self, remote: &UserId, answer: Value) -> Result<(), PeerError> {
        match self.links.get_mut(remote) {
            Some(link) => link.complete(answer).await,
            None => {
                debug!(%remote, "answer for unknown link dropped");
                Ok(())
            }
        }
    }

    async fn close_link(&mut self, remote: &UserId) {
        if let Some(mut link) = self.links.remove(remote) {
            link.close().await;
            info!(%remote, "peer link closed");
        }
    }

    async fn swap_video(&mut self, track: TrackId) -> Result<(), PeerError> {
        for link in self.links.values_mut() {
            if link.state() == LinkState::Closed {
                continue;
            }
            link.replace_video_track(track).await?;
        }
        Ok(())
    }

    fn ensure_link(&mut self, remote: UserId) -> &mut PeerLink {
        let factory = Arc::clone(&self.driver_factory);
        self.links
            .entry(remote.clone())
            .or_insert_with(move || PeerLink::new(remote, factory()))
    }

    fn media(&self) -> Result<&LocalMedia, PeerError> {
        self.local_media
            .as_ref()
            .ok_or_else(|| PeerError::Media("local media not acquired".into()))
    }
}
