use crate::calls::session::{CallSession, CallState};
use crate::relay::SignalingRelay;
use huddle_core::{
    CallId, EndReason, MediaType, ServerMessage, SignalingError, UnavailableReason, UserId,
};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

#[derive(Default)]
struct CallTable {
    sessions: HashMap<CallId, CallSession>,
    /// At most one live session per identity.
    active: HashMap<UserId, CallId>,
}

impl CallTable {
    /// Terminal transition: drops the session, frees both identities and
    /// stops the ring timer. Returns `None` when the session already ended,
    /// which makes every teardown path at-most-once.
    fn finish(&mut self, id: CallId) -> Option<CallSession> {
        let mut session = self.sessions.remove(&id)?;
        self.active.remove(&session.caller);
        self.active.remove(&session.callee);
        if let Some(timer) = session.ring_timer.take() {
            timer.abort();
        }
        session.state = CallState::Ended;
        Some(session)
    }
}

/// Coordinates 1:1 call sessions. Every transition runs behind one lock, so
/// per-identity linearizability falls out of the single critical section;
/// nothing in here blocks on I/O.
#[derive(Clone)]
pub struct CallCoordinator {
    table: Arc<Mutex<CallTable>>,
    relay: Arc<SignalingRelay>,
    ring_timeout: Duration,
}

impl CallCoordinator {
    pub fn new(relay: Arc<SignalingRelay>, ring_timeout: Duration) -> Self {
        Self {
            table: Arc::new(Mutex::new(CallTable::default())),
            relay,
            ring_timeout,
        }
    }

    /// Start a call attempt. The caller either hears the callee ring
    /// (`incomingCall` delivered) or gets an explicit negative:
    /// `callUnavailable` when the callee is offline or busy,
    /// `error{invalidState}` when the caller itself is not free.
    pub async fn invite(
        &self,
        caller: &UserId,
        callee: &UserId,
        media_type: MediaType,
        offer: Value,
    ) {
        let mut table = self.table.lock().await;

        if caller == callee {
            drop(table);
            self.notify_invalid(caller, "cannot call yourself").await;
            return;
        }
        if table.active.contains_key(caller) {
            drop(table);
            self.notify_invalid(caller, "already in a call").await;
            return;
        }
        if table.active.contains_key(callee) {
            drop(table);
            debug!(%caller, %callee, "callee busy");
            let busy = ServerMessage::CallUnavailable {
                to: callee.clone(),
                reason: UnavailableReason::Busy,
            };
            self.relay.to_identity(caller, &busy).await;
            return;
        }

        let ringing = ServerMessage::IncomingCall {
            from: caller.clone(),
            media_type,
            offer,
        };
        let delivered = self.relay.to_identity(callee, &ringing).await;
        if delivered == 0 {
            drop(table);
            warn!(%caller, %callee, "call target offline");
            let offline = ServerMessage::CallUnavailable {
                to: callee.clone(),
                reason: UnavailableReason::Offline,
            };
            self.relay.to_identity(caller, &offline).await;
            return;
        }

        let id = CallId::new();
        let timer = tokio::spawn({
            let coordinator = self.clone();
            async move {
                tokio::time::sleep(coordinator.ring_timeout).await;
                coordinator.on_ring_timeout(id).await;
            }
        });

        table.active.insert(caller.clone(), id);
        table.active.insert(callee.clone(), id);
        table.sessions.insert(
            id,
            CallSession {
                id,
                caller: caller.clone(),
                callee: callee.clone(),
                media_type,
                state: CallState::Ringing,
                ring_timer: Some(timer.abort_handle()),
            },
        );
        info!(%id, %caller, %callee, ?media_type, "call ringing");
    }

    /// Accept the ringing call. Duplicate accepts of an already-connected
    /// session are ignored; anything else out of state gets an explicit
    /// negative.
    pub async fn accept(&self, party: &UserId, answer: Value) {
        let mut table = self.table.lock().await;

        let Some(id) = table.active.get(party).copied() else {
            drop(table);
            self.notify_invalid(party, "no ringing call to accept").await;
            return;
        };
        let Some(session) = table.sessions.get_mut(&id) else {
            return;
        };
        if session.callee != *party {
            drop(table);
            self.notify_invalid(party, "only the callee can accept").await;
            return;
        }

        match session.state {
            CallState::Ringing => {
                session.state = CallState::Connected;
                if let Some(timer) = session.ring_timer.take() {
                    timer.abort();
                }
                let caller = session.caller.clone();
                info!(%id, callee = %party, "call accepted");
                let accepted = ServerMessage::CallAccepted {
                    from: party.clone(),
                    answer,
                };
                self.relay.to_identity(&caller, &accepted).await;
            }
            CallState::Connected => {
                // retransmit or second device; the first accept won
                debug!(%id, "duplicate accept ignored");
            }
            CallState::Ended => {}
        }
    }

    /// Withdraw (caller) or reject (callee) a call that is still ringing.
    pub async fn cancel(&self, party: &UserId) {
        let mut table = self.table.lock().await;

        let Some(id) = table.active.get(party).copied() else {
            drop(table);
            self.notify_invalid(party, "no call to cancel").await;
            return;
        };
        let Some(session) = table.sessions.get(&id) else {
            return;
        };

        match session.state {
            CallState::Ringing => {
                let Some(session) = table.finish(id) else {
                    return;
                };
                let Some(other) = session.other_party(party).cloned() else {
                    return;
                };
                info!(%id, by = %party, "call cancelled");
                let cancelled = ServerMessage::CallCancelled {
                    from: party.clone(),
                };
                self.relay.to_identity(&other, &cancelled).await;
            }
            CallState::Connected => {
                drop(table);
                self.notify_invalid(party, "call already connected, hang up instead")
                    .await;
            }
            CallState::Ended => {}
        }
    }

    /// Hang up. Both parties hear `callEnded` with the identity of whoever
    /// ended it; a still-ringing call degrades to a cancel.
    pub async fn end(&self, party: &UserId) {
        let mut table = self.table.lock().await;

        let Some(id) = table.active.get(party).copied() else {
            drop(table);
            self.notify_invalid(party, "no call to end").await;
            return;
        };
        let Some(session) = table.sessions.get(&id) else {
            return;
        };

        match session.state {
            CallState::Ringing => {
                drop(table);
                self.cancel(party).await;
            }
            CallState::Connected => {
                let Some(session) = table.finish(id) else {
                    return;
                };
                info!(%id, by = %party, "call ended");
                let ended = ServerMessage::CallEnded {
                    from: party.clone(),
                    reason: EndReason::Hangup,
                };
                self.relay.to_identity(&session.caller, &ended).await;
                self.relay.to_identity(&session.callee, &ended).await;
            }
            CallState::Ended => {}
        }
    }

    /// Forward a candidate within the sender's live call when `to` is the
    /// other party. Hands the candidate back when the call table has no claim
    /// on it, so the caller can try room scope; a candidate racing teardown
    /// is dropped there without any observable effect.
    pub async fn relay_ice(&self, party: &UserId, to: &UserId, candidate: Value) -> Option<Value> {
        let table = self.table.lock().await;

        let Some(id) = table.active.get(party).copied() else {
            return Some(candidate);
        };
        let Some(session) = table.sessions.get(&id) else {
            return Some(candidate);
        };
        if session.other_party(party) != Some(to) {
            return Some(candidate);
        }
        drop(table);

        let msg = ServerMessage::IceCandidate {
            from: party.clone(),
            candidate,
        };
        self.relay.to_identity(to, &msg).await;
        None
    }

    /// An identity's last connection dropped: force-end its session and tell
    /// the remaining party, exactly as an explicit end would.
    pub async fn on_disconnect(&self, identity: &UserId) {
        let mut table = self.table.lock().await;

        let Some(id) = table.active.get(identity).copied() else {
            return;
        };
        let Some(session) = table.finish(id) else {
            return;
        };
        let Some(other) = session.other_party(identity).cloned() else {
            return;
        };
        drop(table);

        info!(%id, %identity, "participant disconnected, ending call");
        let ended = ServerMessage::CallEnded {
            from: identity.clone(),
            reason: EndReason::Disconnected,
        };
        self.relay.to_identity(&other, &ended).await;
    }

    /// Bounded ringing: an unanswered invite may not leak a session forever.
    async fn on_ring_timeout(&self, id: CallId) {
        let mut table = self.table.lock().await;

        match table.sessions.get(&id) {
            Some(session) if session.state == CallState::Ringing => {}
            _ => return,
        }
        let Some(session) = table.finish(id) else {
            return;
        };
        drop(table);

        warn!(%id, caller = %session.caller, callee = %session.callee, "ring timeout");
        let to_caller = ServerMessage::CallEnded {
            from: session.callee.clone(),
            reason: EndReason::Timeout,
        };
        let to_callee = ServerMessage::CallEnded {
            from: session.caller.clone(),
            reason: EndReason::Timeout,
        };
        self.relay.to_identity(&session.caller, &to_caller).await;
        self.relay.to_identity(&session.callee, &to_callee).await;
    }

    async fn notify_invalid(&self, party: &UserId, detail: &str) {
        let err = SignalingError::InvalidState(detail.to_owned());
        debug!(%party, %err, "out-of-state call message");
        self.relay.to_identity(party, &err.to_event()).await;
    }
}
