use huddle_core::{ClientMessage, ErrorCode, MediaType, ServerMessage, UnavailableReason, UserId};
use serde_json::json;

use crate::integration::{create_test_app, init_tracing};
use crate::utils::TestConn;

fn call(to: &str) -> ClientMessage {
    ClientMessage::CallUser {
        to: UserId::from(to),
        media_type: MediaType::Audio,
        offer: json!({"sdp": "offer"}),
    }
}

#[tokio::test]
async fn test_calling_a_busy_identity_gets_an_explicit_negative() {
    init_tracing();
    let state = create_test_app();

    let u1 = TestConn::register(&state, "U1").await;
    let mut u2 = TestConn::register(&state, "U2").await;
    let mut u3 = TestConn::register(&state, "U3").await;

    u1.send(call("U2")).await;
    u2.recv().await; // incomingCall; U2 is committed even before accepting

    u3.send(call("U2")).await;
    match u3.recv().await {
        ServerMessage::CallUnavailable { to, reason } => {
            assert_eq!(to, UserId::from("U2"));
            assert_eq!(reason, UnavailableReason::Busy);
        }
        other => panic!("expected callUnavailable, got {other:?}"),
    }
}

#[tokio::test]
async fn test_a_caller_in_a_call_cannot_start_another() {
    init_tracing();
    let state = create_test_app();

    let mut u1 = TestConn::register(&state, "U1").await;
    let mut u2 = TestConn::register(&state, "U2").await;
    let _u3 = TestConn::register(&state, "U3").await;

    u1.send(call("U2")).await;
    u2.recv().await; // incomingCall

    u1.send(call("U3")).await;
    match u1.recv().await {
        ServerMessage::Error { code, .. } => assert_eq!(code, ErrorCode::InvalidState),
        other => panic!("expected error, got {other:?}"),
    }
}
