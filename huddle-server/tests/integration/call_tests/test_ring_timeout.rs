use huddle_core::{ClientMessage, EndReason, MediaType, ServerMessage, UserId};
use serde_json::json;
use std::time::Duration;

use crate::integration::{create_test_app_with_ring_timeout, init_tracing};
use crate::utils::TestConn;

#[tokio::test]
async fn test_unanswered_invite_times_out_for_both_parties() {
    init_tracing();
    let state = create_test_app_with_ring_timeout(Duration::from_millis(50));

    let mut u1 = TestConn::register(&state, "U1").await;
    let mut u2 = TestConn::register(&state, "U2").await;

    u1.send(ClientMessage::CallUser {
        to: UserId::from("U2"),
        media_type: MediaType::Video,
        offer: json!({"sdp": "offer"}),
    })
    .await;
    u2.recv().await; // incomingCall, left unanswered

    match u1.recv().await {
        ServerMessage::CallEnded { from, reason } => {
            assert_eq!(from, UserId::from("U2"));
            assert_eq!(reason, EndReason::Timeout);
        }
        other => panic!("expected callEnded, got {other:?}"),
    }
    match u2.recv().await {
        ServerMessage::CallEnded { from, reason } => {
            assert_eq!(from, UserId::from("U1"));
            assert_eq!(reason, EndReason::Timeout);
        }
        other => panic!("expected callEnded, got {other:?}"),
    }

    // the table no longer holds the session, so both identities are free
    u2.send(ClientMessage::CallUser {
        to: UserId::from("U1"),
        media_type: MediaType::Audio,
        offer: json!({"sdp": "offer-2"}),
    })
    .await;
    assert!(matches!(
        u1.recv().await,
        ServerMessage::IncomingCall { .. }
    ));
}
