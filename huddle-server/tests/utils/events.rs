use crate::utils::TestConn;
use huddle_core::{RoomCode, ServerMessage, UserId};

/// Wait for the join bootstrap and check its member list, order-insensitive.
pub async fn expect_existing_members(conn: &mut TestConn, room: &str, expected: &[&str]) {
    match conn.recv().await {
        ServerMessage::ExistingMembers {
            room: code,
            mut members,
        } => {
            assert_eq!(code, RoomCode::from(room));
            members.sort_by(|a, b| a.0.cmp(&b.0));
            let mut expected: Vec<UserId> = expected.iter().map(|s| UserId::from(*s)).collect();
            expected.sort_by(|a, b| a.0.cmp(&b.0));
            assert_eq!(members, expected);
        }
        other => panic!("expected existingMembers, got {other:?}"),
    }
}

pub async fn expect_member_joined(conn: &mut TestConn, room: &str, member: &str) {
    match conn.recv().await {
        ServerMessage::MemberJoined {
            room: code,
            member: who,
        } => {
            assert_eq!(code, RoomCode::from(room));
            assert_eq!(who, UserId::from(member));
        }
        other => panic!("expected memberJoined, got {other:?}"),
    }
}

pub async fn expect_member_left(conn: &mut TestConn, room: &str, member: &str) {
    match conn.recv().await {
        ServerMessage::MemberLeft {
            room: code,
            member: who,
        } => {
            assert_eq!(code, RoomCode::from(room));
            assert_eq!(who, UserId::from(member));
        }
        other => panic!("expected memberLeft, got {other:?}"),
    }
}
