use crate::server::{ServerRouter, ServerState};
use axum::{
    Router,
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
};
use axum_extra::routing::{RouterExt, TypedPath};
use serde::Deserialize;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};
use treffpunkt_common::event::ForumEvent;

pub fn routes() -> ServerRouter {
    Router::new().typed_get(events)
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/api/events")]
struct EventsPath;

/// One shared push channel per client. Subscribing replays no history,
/// clients fetch snapshots through the read endpoints first.
async fn events(
    _: EventsPath,
    State(state): State<ServerState>,
    upgrade: WebSocketUpgrade,
) -> Response {
    let events = state.broadcaster.subscribe();
    let shutdown = state.shutdown.clone();

    upgrade.on_upgrade(move |socket| subscriber_loop(socket, events, shutdown))
}

async fn subscriber_loop(
    mut socket: WebSocket,
    mut events: broadcast::Receiver<ForumEvent>,
    shutdown: CancellationToken,
) {
    debug!("Subscriber connected");

    loop {
        tokio::select! {
            () = shutdown.cancelled() => {
                let _ = socket.send(Message::Close(None)).await;
                break;
            }
            received = events.recv() => match received {
                Ok(event) => {
                    let payload = match serde_json::to_string(&event) {
                        Ok(payload) => payload,
                        Err(err) => {
                            error!(error = %err, event = event.name(), "Dropping unserializable event");
                            continue;
                        }
                    };
                    if socket.send(Message::Text(payload.into())).await.is_err() {
                        break;
                    }
                }
                // Lost events stay lost for this subscriber, it is expected
                // to re-fetch a snapshot. Others are unaffected.
                Err(RecvError::Lagged(missed)) => warn!(missed, "Subscriber lagging"),
                Err(RecvError::Closed) => break,
            },
            incoming = socket.recv() => match incoming {
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(err)) => {
                    debug!(error = %err, "Subscriber socket error");
                    break;
                }
            },
        }
    }

    debug!("Subscriber disconnected");
}
