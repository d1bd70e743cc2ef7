use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use service::notifier::{ChangeNotifier, Subscription};
use tracing::{debug, info};

use crate::state::AppState;

/// Upgrade to a WebSocket that streams change events.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state.notifier))
}

/// Forward events until either side goes away. Client frames are read and dropped.
async fn handle_socket(socket: WebSocket, notifier: Arc<ChangeNotifier>) {
    let Subscription { id, mut receiver } = notifier.attach();
    info!(listener = %id, "websocket connected");
    let (mut sink, mut stream) = socket.split();

    loop {
        tokio::select! {
            event = receiver.recv() => match event {
                Some(payload) => {
                    if sink.send(Message::Text(payload.to_string())).await.is_err() {
                        break;
                    }
                }
                // detached by the notifier (queue overflow)
                None => break,
            },
            incoming = stream.next() => match incoming {
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    debug!(listener = %id, error = %e, "websocket read error");
                    break;
                }
            },
        }
    }

    notifier.detach(id);
    let _ = sink.close().await;
    info!(listener = %id, "websocket disconnected");
}
