use std::fmt::Display;

use axum::extract::ws::{CloseFrame, Message, WebSocket, close_code};
use futures::{Sink, SinkExt, Stream, StreamExt};
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    dto::{room::RoomSnapshot, ws::RoomEvent},
    services::ticket_service::{self, Admission},
    state::{SharedState, room::RoomId},
};

/// Reason sent with the close frame of a refused connection.
const DENIED_REASON: &str = "denied";

/// Failure while pushing a frame to the client.
#[derive(Debug, Error)]
enum SendError {
    /// The socket is gone.
    #[error("connection closed")]
    ConnectionClosed,
}

/// Handle the full lifecycle of a room observer connection.
pub async fn handle_socket(
    state: SharedState,
    socket: WebSocket,
    room_id: RoomId,
    ticket: Option<String>,
) {
    let (sender, receiver) = socket.split();
    run_session(state, sender, receiver, room_id, ticket).await;
}

/// Admit the observer, then forward room snapshots until either side goes away.
///
/// A refused observer only receives a close frame with code 1008.
async fn run_session<Tx, Rx, E>(
    state: SharedState,
    mut sender: Tx,
    mut receiver: Rx,
    room_id: RoomId,
    ticket: Option<String>,
) where
    Tx: Sink<Message> + Unpin,
    Tx::Error: Display,
    Rx: Stream<Item = Result<Message, E>> + Unpin,
    E: Display,
{
    let Admission {
        identity,
        mut subscription,
        initial,
    } = match ticket_service::admit(&state, room_id, ticket.as_deref()).await {
        Ok(admission) => admission,
        Err(denied) => {
            let frame = CloseFrame {
                code: close_code::POLICY,
                reason: DENIED_REASON.into(),
            };
            if let Err(err) = sender.send(Message::Close(Some(frame))).await {
                warn!(room_id = %room_id, error = %err, "failed to close denied connection");
            }
            info!(room_id = %room_id, reason = %denied, "room connection refused");
            return;
        }
    };

    info!(room_id = %room_id, identity = %identity, "room observer connected");

    if send_snapshot(&mut sender, &initial).await.is_ok() {
        loop {
            tokio::select! {
                snapshot = subscription.recv() => {
                    let Some(snapshot) = snapshot else { break };
                    if send_snapshot(&mut sender, &snapshot).await.is_err() {
                        break;
                    }
                }
                message = receiver.next() => match message {
                    Some(Ok(Message::Ping(payload))) => {
                        if sender.send(Message::Pong(payload)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(frame))) => {
                        let _ = sender.send(Message::Close(frame)).await;
                        break;
                    }
                    // observers have nothing to say
                    Some(Ok(_)) => {}
                    Some(Err(err)) => {
                        warn!(room_id = %room_id, identity = %identity, error = %err, "websocket error");
                        break;
                    }
                    None => break,
                },
            }
        }
    }

    state
        .hub()
        .unsubscribe(subscription.room_id(), subscription.id());
    info!(room_id = %room_id, identity = %identity, "room observer disconnected");
}

/// Serialize a snapshot as a `{ "data": ... }` frame and send it.
///
/// Serialization failures are logged and skipped; only a closed socket is an error.
async fn send_snapshot<Tx>(sender: &mut Tx, snapshot: &RoomSnapshot) -> Result<(), SendError>
where
    Tx: Sink<Message> + Unpin,
{
    let payload = match serde_json::to_string(&RoomEvent { data: snapshot }) {
        Ok(payload) => payload,
        Err(err) => {
            warn!(error = %err, "failed to serialize room snapshot");
            return Ok(());
        }
    };

    sender
        .send(Message::Text(payload.into()))
        .await
        .map_err(|_| SendError::ConnectionClosed)
}

#[cfg(test)]
mod tests {
    use futures::{channel::mpsc, stream};

    use super::*;
    use crate::services::{
        tests::{started_room, test_state},
        ticket_service::issue_ticket,
    };

    async fn frames_for(
        state: &SharedState,
        room_id: RoomId,
        ticket: Option<String>,
        inbound: Vec<Message>,
    ) -> Vec<Message> {
        let (tx, rx) = mpsc::unbounded();
        let inbound = stream::iter(inbound.into_iter().map(Ok::<_, axum::Error>));
        run_session(state.clone(), tx, inbound, room_id, ticket).await;
        rx.collect().await
    }

    fn assert_denied(frames: &[Message]) {
        match frames {
            [Message::Close(Some(frame))] => {
                assert_eq!(frame.code, close_code::POLICY);
                assert_eq!(frame.reason.as_str(), DENIED_REASON);
            }
            other => panic!("expected a single close frame, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn refused_tickets_get_a_policy_close() {
        let state = test_state();
        let room_id = started_room(&state).await;

        assert_denied(&frames_for(&state, room_id, None, vec![]).await);
        assert_denied(&frames_for(&state, room_id, Some("forged.ticket".into()), vec![]).await);

        let ticket = issue_ticket(&state, room_id, "alice").await.unwrap().ticket;
        let other_room = started_room(&state).await;
        assert_denied(&frames_for(&state, other_room, Some(ticket), vec![]).await);

        assert_eq!(state.hub().subscriber_count(room_id), 0);
    }

    #[tokio::test]
    async fn admitted_observer_gets_the_snapshot_then_leaves_cleanly() {
        let state = test_state();
        let room_id = started_room(&state).await;
        let ticket = issue_ticket(&state, room_id, "bob").await.unwrap().ticket;

        let frames = frames_for(&state, room_id, Some(ticket), vec![Message::Close(None)]).await;
        let [Message::Text(initial), Message::Close(None)] = frames.as_slice() else {
            panic!("unexpected frames {frames:?}");
        };
        let event: serde_json::Value = serde_json::from_str(initial.as_str()).unwrap();
        assert_eq!(event["data"]["room_id"], room_id.to_string());
        assert_eq!(event["data"]["members"][1], "bob");

        assert_eq!(state.hub().subscriber_count(room_id), 0);
    }
}
