use crate::relay::SignalingRelay;
use crate::rooms::room::Room;
use crate::rooms::room_command::RoomCommand;
use dashmap::DashMap;
use huddle_core::{RoomCode, UserId};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::info;

const ROOM_MAILBOX_SIZE: usize = 100;

/// Owns the room registry: lazy creation on first join, removal when a room
/// empties, and the membership index used to authorize directed relay.
#[derive(Clone)]
pub struct RoomManager {
    rooms: Arc<DashMap<RoomCode, mpsc::Sender<RoomCommand>>>,
    members_index: Arc<DashMap<UserId, HashSet<RoomCode>>>,
    relay: Arc<SignalingRelay>,
}

impl RoomManager {
    pub fn new(relay: Arc<SignalingRelay>) -> Self {
        Self {
            rooms: Arc::new(DashMap::new()),
            members_index: Arc::new(DashMap::new()),
            relay,
        }
    }

    /// Route a command to its room. `Join` creates the room on demand; other
    /// commands are dropped when the room no longer exists. A send into a
    /// mailbox that closed mid-flight retries against a fresh room. Returns
    /// whether the command reached a room.
    pub async fn dispatch(&self, code: RoomCode, mut cmd: RoomCommand) -> bool {
        loop {
            let create = matches!(cmd, RoomCommand::Join { .. });
            let Some(tx) = self.sender_for(&code, create) else {
                return false;
            };
            match tx.send(cmd).await {
                Ok(()) => return true,
                Err(mpsc::error::SendError(returned)) => {
                    cmd = returned;
                    self.rooms.remove_if(&code, |_, t| t.same_channel(&tx));
                }
            }
        }
    }

    /// True when the two identities currently share at least one room; the
    /// authorization check for directed in-room relay.
    pub fn share_room(&self, a: &UserId, b: &UserId) -> bool {
        let Some(rooms_a) = self.members_index.get(a) else {
            return false;
        };
        let Some(rooms_b) = self.members_index.get(b) else {
            return false;
        };
        rooms_a.iter().any(|code| rooms_b.contains(code))
    }

    /// An identity's last connection dropped: walk it out of every room it
    /// was in.
    pub async fn on_disconnect(&self, identity: &UserId) {
        let codes: Vec<RoomCode> = self
            .members_index
            .get(identity)
            .map(|rooms| rooms.iter().cloned().collect())
            .unwrap_or_default();

        for code in codes {
            self.dispatch(
                code,
                RoomCommand::Disconnected {
                    identity: identity.clone(),
                },
            )
            .await;
        }
    }

    fn sender_for(&self, code: &RoomCode, create: bool) -> Option<mpsc::Sender<RoomCommand>> {
        if let Some(tx) = self.rooms.get(code) {
            return Some(tx.clone());
        }
        if !create {
            return None;
        }
        let tx = self
            .rooms
            .entry(code.clone())
            .or_insert_with(|| self.spawn_room(code.clone()))
            .clone();
        Some(tx)
    }

    fn spawn_room(&self, code: RoomCode) -> mpsc::Sender<RoomCommand> {
        info!(room = %code, "creating room");
        let (tx, rx) = mpsc::channel(ROOM_MAILBOX_SIZE);

        let room = Room::new(
            code.clone(),
            tx.clone(),
            rx,
            self.relay.clone(),
            self.rooms.clone(),
            self.members_index.clone(),
        );

        let manager = self.clone();
        tokio::spawn(async move {
            for cmd in room.run().await {
                manager.dispatch(code.clone(), cmd).await;
            }
        });

        tx
    }
}
