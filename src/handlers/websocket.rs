use futures_util::sink::SinkExt;
use futures_util::stream::StreamExt;
use log::{debug, error, info, warn};
use tokio::sync::mpsc;
use warp::ws::{Message, WebSocket};

use crate::constants::CLOSE_ROOM_NOT_FOUND;
use crate::core::hub::ConnectionHub;
use crate::core::room::SharedRoomRegistry;

// Handle a WebSocket connection for (room code, player token)
pub async fn handle_ws_client(
    ws: WebSocket,
    code: String,
    token: String,
    registry: SharedRoomRegistry,
) {
    let (mut ws_tx, mut ws_rx) = ws.split();
    let (tx, mut rx) = mpsc::unbounded_channel();

    // Forward messages from our channel to the WebSocket
    tokio::task::spawn(async move {
        while let Some(message) = rx.recv().await {
            if let Err(e) = ws_tx.send(message).await {
                debug!("WebSocket sink closed: {}", e);
                break;
            }
        }
    });

    let hub = ConnectionHub::new(registry);

    if let Err(e) = hub.attach(&code, &token, tx.clone()).await {
        warn!("Rejecting connection for room {}: {}", code, e);
        let _ = tx.send(Message::close_with(CLOSE_ROOM_NOT_FOUND, "Room not found"));
        return;
    }

    // Receive loop: one frame at a time, in arrival order
    while let Some(result) = ws_rx.next().await {
        match result {
            Ok(msg) => {
                if msg.is_close() {
                    break;
                }
                if let Ok(text) = msg.to_str() {
                    hub.handle_text(&code, &token, text).await;
                }
            }
            Err(e) => {
                error!("WebSocket error for {} in room {}: {}", token, code, e);
                break;
            }
        }
    }

    // Cleanup runs on every exit path of the loop above
    hub.detach(&code, &token).await;
    info!("Connection detached: {} from room {}", token, code);
}
