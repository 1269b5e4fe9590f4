use crate::relay::SignalingRelay;
use crate::rooms::room_command::RoomCommand;
use dashmap::DashMap;
use huddle_core::{RoomCode, ServerMessage, SignalingError, UserId};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// One meeting room: a membership set owned by a single task, so join and
/// leave processing for the room is strictly serialized. The task exits when
/// the last member leaves.
pub struct Room {
    code: RoomCode,
    members: HashSet<UserId>,
    created_at: Instant,
    command_tx: mpsc::Sender<RoomCommand>,
    command_rx: mpsc::Receiver<RoomCommand>,
    relay: Arc<SignalingRelay>,
    registry: Arc<DashMap<RoomCode, mpsc::Sender<RoomCommand>>>,
    members_index: Arc<DashMap<UserId, HashSet<RoomCode>>>,
}

impl Room {
    pub(crate) fn new(
        code: RoomCode,
        command_tx: mpsc::Sender<RoomCommand>,
        command_rx: mpsc::Receiver<RoomCommand>,
        relay: Arc<SignalingRelay>,
        registry: Arc<DashMap<RoomCode, mpsc::Sender<RoomCommand>>>,
        members_index: Arc<DashMap<UserId, HashSet<RoomCode>>>,
    ) -> Self {
        Self {
            code,
            members: HashSet::new(),
            created_at: Instant::now(),
            command_tx,
            command_rx,
            relay,
            registry,
            members_index,
        }
    }

    /// Room event loop. Returns the commands still queued at teardown so the
    /// manager can land them in a fresh room instead of losing them.
    pub async fn run(mut self) -> Vec<RoomCommand> {
        info!(room = %self.code, "room opened");

        while let Some(cmd) = self.command_rx.recv().await {
            match cmd {
                RoomCommand::Join { identity } => self.handle_join(identity).await,
                RoomCommand::Leave { identity } => self.handle_leave(identity, false).await,
                RoomCommand::Disconnected { identity } => self.handle_leave(identity, true).await,
            }

            if self.members.is_empty() {
                return self.teardown();
            }
        }

        Vec::new()
    }

    /// Join ordering, which the mesh bootstrap depends on:
    /// snapshot the membership, send the snapshot to the joiner, insert the
    /// joiner, then announce the joiner to the snapshot only.
    async fn handle_join(&mut self, identity: UserId) {
        if self.members.contains(&identity) {
            // second device or re-join; refresh the bootstrap, touch nothing
            let members = self
                .members
                .iter()
                .filter(|m| **m != identity)
                .cloned()
                .collect();
            let snapshot = ServerMessage::ExistingMembers {
                room: self.code.clone(),
                members,
            };
            self.relay.to_identity(&identity, &snapshot).await;
            return;
        }

        let existing: Vec<UserId> = self.members.iter().cloned().collect();

        let snapshot = ServerMessage::ExistingMembers {
            room: self.code.clone(),
            members: existing.clone(),
        };
        self.relay.to_identity(&identity, &snapshot).await;

        self.members.insert(identity.clone());
        self.members_index
            .entry(identity.clone())
            .or_default()
            .insert(self.code.clone());

        info!(room = %self.code, member = %identity, size = self.members.len(), "member joined");
        let joined = ServerMessage::MemberJoined {
            room: self.code.clone(),
            member: identity,
        };
        self.relay.to_each(existing.iter(), &joined).await;
    }

    /// Remove first, then announce to the remainder.
    async fn handle_leave(&mut self, identity: UserId, disconnected: bool) {
        if !self.members.remove(&identity) {
            if !disconnected {
                let err = SignalingError::InvalidState(format!("not in room {}", self.code));
                debug!(room = %self.code, member = %identity, "leave from non-member");
                self.relay.to_identity(&identity, &err.to_event()).await;
            }
            return;
        }

        if let Some(mut rooms) = self.members_index.get_mut(&identity) {
            rooms.remove(&self.code);
        }
        self.members_index
            .remove_if(&identity, |_, rooms| rooms.is_empty());

        info!(room = %self.code, member = %identity, size = self.members.len(), "member left");
        let left = ServerMessage::MemberLeft {
            room: self.code.clone(),
            member: identity,
        };
        self.relay.to_each(self.members.iter(), &left).await;
    }

    /// Unregister, close the mailbox, and hand back whatever was still
    /// queued. A join racing this teardown either fails its send and retries
    /// against a fresh room, or is drained here and re-dispatched.
    fn teardown(mut self) -> Vec<RoomCommand> {
        self.registry
            .remove_if(&self.code, |_, tx| tx.same_channel(&self.command_tx));
        self.command_rx.close();

        let mut orphaned = Vec::new();
        while let Ok(cmd) = self.command_rx.try_recv() {
            orphaned.push(cmd);
        }

        info!(room = %self.code, lifetime = ?self.created_at.elapsed(), "room closed");
        orphaned
    }
}
