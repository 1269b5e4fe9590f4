use huddle_core::{ConnectionId, UserId};
use std::collections::{HashMap, HashSet};
use std::sync::{PoisonError, RwLock};
use tracing::debug;

/// What `unregister` observed while removing a binding.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Departure {
    pub identity: UserId,
    /// True when this was the identity's last live connection.
    pub last_connection: bool,
}

#[derive(Default)]
struct PresenceInner {
    by_connection: HashMap<ConnectionId, UserId>,
    by_identity: HashMap<UserId, HashSet<ConnectionId>>,
}

/// Maps identities to their live connections. Both directions live under one
/// lock so a disconnect can never leave the maps disagreeing.
#[derive(Default)]
pub struct PresenceRegistry {
    inner: RwLock<PresenceInner>,
}

impl PresenceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a connection to an identity. Idempotent; re-registering the same
    /// connection under a different identity moves it.
    pub fn register(&self, conn: ConnectionId, identity: UserId) {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);

        if let Some(prev) = inner.by_connection.insert(conn, identity.clone()) {
            if prev == identity {
                return;
            }
            if let Some(conns) = inner.by_identity.get_mut(&prev) {
                conns.remove(&conn);
                if conns.is_empty() {
                    inner.by_identity.remove(&prev);
                }
            }
        }

        inner.by_identity.entry(identity.clone()).or_default().insert(conn);
        debug!(%conn, %identity, "connection registered");
    }

    /// Remove the binding for a connection, reporting whether the identity
    /// just went fully offline.
    pub fn unregister(&self, conn: &ConnectionId) -> Option<Departure> {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);

        let identity = inner.by_connection.remove(conn)?;
        let last_connection = match inner.by_identity.get_mut(&identity) {
            Some(conns) => {
                conns.remove(conn);
                if conns.is_empty() {
                    inner.by_identity.remove(&identity);
                    true
                } else {
                    false
                }
            }
            None => true,
        };

        debug!(%conn, %identity, last_connection, "connection unregistered");
        Some(Departure {
            identity,
            last_connection,
        })
    }

    /// All live connections of an identity, for multi-device fan-out.
    pub fn resolve(&self, identity: &UserId) -> Vec<ConnectionId> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner
            .by_identity
            .get(identity)
            .map(|conns| conns.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn identity_of(&self, conn: &ConnectionId) -> Option<UserId> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner.by_connection.get(conn).cloned()
    }

    pub fn is_online(&self, identity: &UserId) -> bool {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner.by_identity.contains_key(identity)
    }
}
