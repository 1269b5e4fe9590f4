use crate::app::AppState;
use crate::rooms::RoomCommand;
use huddle_core::{
    ClientMessage, ConnectionId, ServerMessage, SignalingError, UserId,
};
use serde_json::Value;
use tracing::{debug, warn};

/// Route one validated client message. The sender identity is always the
/// registered identity of the connection; a connection that has not
/// registered can do nothing else.
pub async fn handle_client_message(state: &AppState, conn: ConnectionId, msg: ClientMessage) {
    if let ClientMessage::Register { identity } = &msg {
        state.presence.register(conn, identity.clone());
        let ack = ServerMessage::Registered {
            identity: identity.clone(),
            ice_servers: state.ice_servers.clone(),
        };
        state.relay.to_connection(conn, ack).await;
        return;
    }

    let Some(identity) = state.presence.identity_of(&conn) else {
        warn!(%conn, "message from unregistered connection");
        let err = SignalingError::MalformedMessage("register first".into());
        state.relay.to_connection(conn, err.to_event()).await;
        return;
    };

    match msg {
        ClientMessage::Register { .. } => {}
        ClientMessage::CallUser {
            to,
            media_type,
            offer,
        } => state.calls.invite(&identity, &to, media_type, offer).await,
        ClientMessage::AnswerCall { answer } => state.calls.accept(&identity, answer).await,
        ClientMessage::CancelCall => state.calls.cancel(&identity).await,
        ClientMessage::EndCall => state.calls.end(&identity).await,
        ClientMessage::IceCandidate { to, candidate } => {
            // call scope first; the coordinator hands the candidate back when
            // the pair has no live session
            if let Some(candidate) = state.calls.relay_ice(&identity, &to, candidate).await {
                relay_in_room(state, &identity, &to, RoomSignal::Ice(candidate)).await;
            }
        }
        ClientMessage::JoinRoom { room } => {
            state.rooms.dispatch(room, RoomCommand::Join { identity }).await;
        }
        ClientMessage::LeaveRoom { room } => {
            let delivered = state
                .rooms
                .dispatch(
                    room.clone(),
                    RoomCommand::Leave {
                        identity: identity.clone(),
                    },
                )
                .await;
            if !delivered {
                let err = SignalingError::InvalidState(format!("not in room {room}"));
                state.relay.to_identity(&identity, &err.to_event()).await;
            }
        }
        ClientMessage::Offer { to, payload } => {
            relay_in_room(state, &identity, &to, RoomSignal::Offer(payload)).await;
        }
        ClientMessage::Answer { to, payload } => {
            relay_in_room(state, &identity, &to, RoomSignal::Answer(payload)).await;
        }
    }
}

enum RoomSignal {
    Offer(Value),
    Answer(Value),
    Ice(Value),
}

/// Directed mesh negotiation, authorized by shared room membership. Offers
/// and answers to a stranger are rejected; a stray candidate is inert since
/// trickled ICE routinely races membership teardown.
async fn relay_in_room(state: &AppState, from: &UserId, to: &UserId, signal: RoomSignal) {
    if !state.rooms.share_room(from, to) {
        if matches!(signal, RoomSignal::Ice(_)) {
            debug!(%from, %to, "candidate outside any shared room dropped");
            return;
        }
        let err = SignalingError::NotAMember {
            sender: from.clone(),
            target: to.clone(),
        };
        warn!(%err, "directed relay rejected");
        state.relay.to_identity(from, &err.to_event()).await;
        return;
    }

    let msg = match signal {
        RoomSignal::Offer(payload) => ServerMessage::Offer {
            from: from.clone(),
            payload,
        },
        RoomSignal::Answer(payload) => ServerMessage::Answer {
            from: from.clone(),
            payload,
        },
        RoomSignal::Ice(candidate) => ServerMessage::IceCandidate {
            from: from.clone(),
            candidate,
        },
    };

    let delivered = state.relay.to_identity(to, &msg).await;
    if delivered == 0 {
        debug!(%to, "relay target went offline mid-flight, dropped");
    }
}
