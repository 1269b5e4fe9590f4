use huddle_core::{CallId, MediaType, UserId};
use tokio::task::AbortHandle;

/// Lifecycle of one 1:1 call attempt. `Ended` is terminal; terminal sessions
/// are removed from the table immediately, so late messages find nothing.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum CallState {
    Ringing,
    Connected,
    Ended,
}

impl CallState {
    pub fn is_terminal(self) -> bool {
        matches!(self, CallState::Ended)
    }
}

/// One call attempt between exactly two identities.
#[derive(Debug)]
pub struct CallSession {
    pub id: CallId,
    pub caller: UserId,
    pub callee: UserId,
    pub media_type: MediaType,
    pub state: CallState,
    pub(crate) ring_timer: Option<AbortHandle>,
}

impl CallSession {
    /// The participant opposite `party`, or `None` for a stranger.
    pub fn other_party(&self, party: &UserId) -> Option<&UserId> {
        if *party == self.caller {
            Some(&self.callee)
        } else if *party == self.callee {
            Some(&self.caller)
        } else {
            None
        }
    }
}
