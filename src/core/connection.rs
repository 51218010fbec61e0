//! Per-connection outbound handle
//! Wraps the channel feeding a connection's WebSocket forwarder task

use log::warn;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use warp::ws::Message;

/// Outbound side of a single attached WebSocket connection
pub struct Connection {
    pub token: String,
    pub sender: mpsc::UnboundedSender<Message>,
    pub connected_at: Instant,
}

impl Connection {
    pub fn new(token: String, sender: mpsc::UnboundedSender<Message>) -> Self {
        Self {
            token,
            sender,
            connected_at: Instant::now(),
        }
    }

    /// How long this connection has been attached
    pub fn connection_duration(&self) -> Duration {
        self.connected_at.elapsed()
    }

    /// Send a text frame, best-effort: a closed peer is logged and skipped
    pub fn send_text(&self, text: &str) -> bool {
        match self.sender.send(Message::text(text)) {
            Ok(_) => true,
            Err(_) => {
                warn!("Failed to send message to player {}", self.token);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_send_text_delivers_frame() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let conn = Connection::new("token".to_string(), tx);

        assert!(conn.send_text("hello"));
        let frame = rx.recv().await.unwrap();
        assert_eq!(frame.to_str().unwrap(), "hello");
    }

    #[tokio::test]
    async fn test_connection_duration_advances() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let conn = Connection::new("token".to_string(), tx);

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(conn.connection_duration() >= Duration::from_millis(10));
    }

    #[tokio::test]
    async fn test_send_text_reports_closed_peer() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        let conn = Connection::new("token".to_string(), tx);
        assert!(!conn.send_text("hello"));
    }
}
