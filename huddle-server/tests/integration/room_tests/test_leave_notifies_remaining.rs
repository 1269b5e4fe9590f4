use huddle_core::{ClientMessage, ErrorCode, RoomCode, ServerMessage, UserId};
use serde_json::json;

use crate::integration::{create_test_app, init_tracing};
use crate::utils::{TestConn, expect_existing_members, expect_member_joined, expect_member_left};

const ROOM: &str = "standup";

fn join() -> ClientMessage {
    ClientMessage::JoinRoom {
        room: RoomCode::from(ROOM),
    }
}

#[tokio::test]
async fn test_leave_broadcasts_to_the_remainder_only() {
    init_tracing();
    let state = create_test_app();

    let mut a = TestConn::register(&state, "A").await;
    let mut b = TestConn::register(&state, "B").await;
    let mut c = TestConn::register(&state, "C").await;

    a.send(join()).await;
    expect_existing_members(&mut a, ROOM, &[]).await;
    b.send(join()).await;
    expect_existing_members(&mut b, ROOM, &["A"]).await;
    expect_member_joined(&mut a, ROOM, "B").await;
    c.send(join()).await;
    expect_existing_members(&mut c, ROOM, &["A", "B"]).await;
    expect_member_joined(&mut a, ROOM, "C").await;
    expect_member_joined(&mut b, ROOM, "C").await;

    b.send(ClientMessage::LeaveRoom {
        room: RoomCode::from(ROOM),
    })
    .await;

    expect_member_left(&mut a, ROOM, "B").await;
    expect_member_left(&mut c, ROOM, "B").await;
    b.expect_silence().await;

    // the departed member lost its relay authorization with the membership
    b.send(ClientMessage::Offer {
        to: UserId::from("A"),
        payload: json!({"sdp": "offer"}),
    })
    .await;
    match b.recv().await {
        ServerMessage::Error { code, .. } => assert_eq!(code, ErrorCode::NotAMember),
        other => panic!("expected error, got {other:?}"),
    }
    a.expect_silence().await;
}

#[tokio::test]
async fn test_leaving_a_room_you_are_not_in_is_answered() {
    init_tracing();
    let state = create_test_app();

    let mut a = TestConn::register(&state, "A").await;

    a.send(ClientMessage::LeaveRoom {
        room: RoomCode::from("nowhere"),
    })
    .await;
    match a.recv().await {
        ServerMessage::Error { code, .. } => assert_eq!(code, ErrorCode::InvalidState),
        other => panic!("expected error, got {other:?}"),
    }
}
