use huddle_core::UserId;

/// Commands flowing into a room's mailbox from the dispatch layer.
#[derive(Debug)]
pub enum RoomCommand {
    /// An identity asked to join, possibly from a second device.
    Join { identity: UserId },

    /// An identity asked to leave.
    Leave { identity: UserId },

    /// An identity's last connection dropped.
    Disconnected { identity: UserId },
}
