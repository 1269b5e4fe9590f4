use huddle_core::{ClientMessage, RoomCode, ServerMessage, UserId};
use serde_json::json;

use crate::integration::{create_test_app, init_tracing};
use crate::utils::{TestConn, expect_existing_members, expect_member_joined};

const ROOM: &str = "design-review";

fn join() -> ClientMessage {
    ClientMessage::JoinRoom {
        room: RoomCode::from(ROOM),
    }
}

#[tokio::test]
async fn test_mesh_negotiation_is_relayed_verbatim_between_members() {
    init_tracing();
    let state = create_test_app();

    let mut a = TestConn::register(&state, "A").await;
    let mut b = TestConn::register(&state, "B").await;

    a.send(join()).await;
    expect_existing_members(&mut a, ROOM, &[]).await;
    b.send(join()).await;
    expect_existing_members(&mut b, ROOM, &["A"]).await;
    expect_member_joined(&mut a, ROOM, "B").await;

    let offer = json!({"sdp": "v=0 offer-from-b", "type": "offer"});
    b.send(ClientMessage::Offer {
        to: UserId::from("A"),
        payload: offer.clone(),
    })
    .await;
    match a.recv().await {
        ServerMessage::Offer { from, payload } => {
            assert_eq!(from, UserId::from("B"));
            assert_eq!(payload, offer);
        }
        other => panic!("expected offer, got {other:?}"),
    }

    let answer = json!({"sdp": "v=0 answer-from-a", "type": "answer"});
    a.send(ClientMessage::Answer {
        to: UserId::from("B"),
        payload: answer.clone(),
    })
    .await;
    match b.recv().await {
        ServerMessage::Answer { from, payload } => {
            assert_eq!(from, UserId::from("A"));
            assert_eq!(payload, answer);
        }
        other => panic!("expected answer, got {other:?}"),
    }

    // with no 1:1 session in the way, candidates take the room path
    a.send(ClientMessage::IceCandidate {
        to: UserId::from("B"),
        candidate: json!({"candidate": "room-c1"}),
    })
    .await;
    match b.recv().await {
        ServerMessage::IceCandidate { from, candidate } => {
            assert_eq!(from, UserId::from("A"));
            assert_eq!(candidate, json!({"candidate": "room-c1"}));
        }
        other => panic!("expected iceCandidate, got {other:?}"),
    }
}
