use huddle_core::{ClientMessage, RoomCode};

use crate::integration::{create_test_app, init_tracing};
use crate::utils::{TestConn, expect_existing_members, expect_member_joined};

const ROOM: &str = "team-7-abcd";

fn join() -> ClientMessage {
    ClientMessage::JoinRoom {
        room: RoomCode::from(ROOM),
    }
}

#[tokio::test]
async fn test_joiner_sees_existing_members_and_they_see_the_joiner() {
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

    // nobody hears about their own join
    b.expect_silence().await;

    c.send(join()).await;
    expect_existing_members(&mut c, ROOM, &["A", "B"]).await;
    expect_member_joined(&mut a, ROOM, "C").await;
    expect_member_joined(&mut b, ROOM, "C").await;

    // exactly one bootstrap for the joiner, exactly one announcement each
    a.expect_silence().await;
    b.expect_silence().await;
    c.expect_silence().await;
}

#[tokio::test]
async fn test_two_rooms_do_not_leak_into_each_other() {
    init_tracing();
    let state = create_test_app();

    let mut a = TestConn::register(&state, "A").await;
    let mut b = TestConn::register(&state, "B").await;

    a.send(ClientMessage::JoinRoom {
        room: RoomCode::from("room-one"),
    })
    .await;
    expect_existing_members(&mut a, "room-one", &[]).await;

    b.send(ClientMessage::JoinRoom {
        room: RoomCode::from("room-two"),
    })
    .await;
    expect_existing_members(&mut b, "room-two", &[]).await;

    // different rooms: no cross-talk
    a.expect_silence().await;
    b.expect_silence().await;

    a.send(ClientMessage::JoinRoom {
        room: RoomCode::from("room-two"),
    })
    .await;
    expect_existing_members(&mut a, "room-two", &["B"]).await;
    expect_member_joined(&mut b, "room-two", "A").await;
}
