use huddle_core::{ClientMessage, MediaType, ServerMessage, UnavailableReason, UserId};
use serde_json::json;

use crate::integration::{create_test_app, init_tracing};
use crate::utils::TestConn;

#[tokio::test]
async fn test_calling_an_offline_identity_gets_an_explicit_negative() {
    init_tracing();
    let state = create_test_app();

    let mut u1 = TestConn::register(&state, "U1").await;

    u1.send(ClientMessage::CallUser {
        to: UserId::from("ghost"),
        media_type: MediaType::Audio,
        offer: json!({"sdp": "offer"}),
    })
    .await;

    match u1.recv().await {
        ServerMessage::CallUnavailable { to, reason } => {
            assert_eq!(to, UserId::from("ghost"));
            assert_eq!(reason, UnavailableReason::Offline);
        }
        other => panic!("expected callUnavailable, got {other:?}"),
    }

    // no session was created, so the caller is free to try someone else
    let mut u2 = TestConn::register(&state, "U2").await;
    u1.send(ClientMessage::CallUser {
        to: UserId::from("U2"),
        media_type: MediaType::Audio,
        offer: json!({"sdp": "offer"}),
    })
    .await;
    assert!(matches!(
        u2.recv().await,
        ServerMessage::IncomingCall { .. }
    ));
}
