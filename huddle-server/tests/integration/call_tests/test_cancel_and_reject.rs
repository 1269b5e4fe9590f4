use huddle_core::{ClientMessage, ErrorCode, MediaType, ServerMessage, UserId};
use serde_json::json;

use crate::integration::{create_test_app, init_tracing};
use crate::utils::TestConn;

fn call(to: &str) -> ClientMessage {
    ClientMessage::CallUser {
        to: UserId::from(to),
        media_type: MediaType::Video,
        offer: json!({"sdp": "offer"}),
    }
}

#[tokio::test]
async fn test_caller_withdraws_a_ringing_call() {
    init_tracing();
    let state = create_test_app();

    let mut u1 = TestConn::register(&state, "U1").await;
    let mut u2 = TestConn::register(&state, "U2").await;

    u1.send(call("U2")).await;
    u2.recv().await; // incomingCall

    u1.send(ClientMessage::CancelCall).await;
    match u2.recv().await {
        ServerMessage::CallCancelled { from } => assert_eq!(from, UserId::from("U1")),
        other => panic!("expected callCancelled, got {other:?}"),
    }

    // the accept now targets a dead session and is answered explicitly
    u2.send(ClientMessage::AnswerCall {
        answer: json!({"sdp": "answer"}),
    })
    .await;
    match u2.recv().await {
        ServerMessage::Error { code, .. } => assert_eq!(code, ErrorCode::InvalidState),
        other => panic!("expected error, got {other:?}"),
    }
    u1.expect_silence().await;
}

#[tokio::test]
async fn test_callee_rejects_a_ringing_call() {
    init_tracing();
    let state = create_test_app();

    let mut u1 = TestConn::register(&state, "U1").await;
    let mut u2 = TestConn::register(&state, "U2").await;

    u1.send(call("U2")).await;
    u2.recv().await; // incomingCall

    u2.send(ClientMessage::CancelCall).await;
    match u1.recv().await {
        ServerMessage::CallCancelled { from } => assert_eq!(from, UserId::from("U2")),
        other => panic!("expected callCancelled, got {other:?}"),
    }
    u2.expect_silence().await;
}
