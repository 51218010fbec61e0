use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::sync::RwLock;
use warp::ws::Message;

use crate::core::connection::Connection;
use crate::core::identity::IdentityGenerator;
use crate::core::message::ServerMessage;
use crate::error::{ChessRelayError, Result};

/// One chess session: membership, live connections, and match state
pub struct Room {
    /// Unique room code, primary key in the registry
    pub code: String,
    /// Token of the creator; sole authority to start the game
    pub host_token: String,
    /// Configured per-side clock allotment, in seconds
    pub time: f64,
    /// Player tokens in join order
    pub members: Vec<String>,
    /// Live connections keyed by player token
    pub connections: HashMap<String, Connection>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub started: bool,
    pub white_token: Option<String>,
    pub black_token: Option<String>,
    pub white_time_left: f64,
    pub black_time_left: f64,
    pub is_whites_turn: bool,
    /// Advisory only; clocks are client-reported
    pub last_timer_update: chrono::DateTime<chrono::Utc>,
}

impl Room {
    pub fn new(code: String, host_token: String, time: f64) -> Self {
        Self {
            code,
            host_token: host_token.clone(),
            time,
            members: vec![host_token],
            connections: HashMap::new(),
            created_at: chrono::Utc::now(),
            started: false,
            white_token: None,
            black_token: None,
            white_time_left: time,
            black_time_left: time,
            is_whites_turn: true,
            last_timer_update: chrono::Utc::now(),
        }
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Register a live connection for a token. A token that skipped the
    /// join step is added to the member list here so that membership and
    /// connections stay consistent.
    pub fn attach(&mut self, token: String, sender: mpsc::UnboundedSender<Message>) {
        if !self.members.contains(&token) {
            self.members.push(token.clone());
        }
        self.connections
            .insert(token.clone(), Connection::new(token, sender));
    }

    /// Drop a token's connection and membership. Returns whether a live
    /// connection was actually removed, so repeated detaches stay no-ops.
    pub fn detach(&mut self, token: &str) -> bool {
        let removed = self.connections.remove(token).is_some();
        self.members.retain(|m| m != token);
        removed
    }

    /// Send to every attached connection, skipping failed peers
    pub fn broadcast(&self, message: &ServerMessage) -> usize {
        self.broadcast_filtered(message, None)
    }

    /// Send to every attached connection except one token
    pub fn broadcast_except(&self, message: &ServerMessage, exclude: &str) -> usize {
        self.broadcast_filtered(message, Some(exclude))
    }

    fn broadcast_filtered(&self, message: &ServerMessage, exclude: Option<&str>) -> usize {
        let text = match serde_json::to_string(message) {
            Ok(text) => text,
            Err(e) => {
                log::error!("Failed to serialize broadcast for room {}: {}", self.code, e);
                return 0;
            }
        };

        let mut success_count = 0;
        for (token, connection) in &self.connections {
            if exclude == Some(token.as_str()) {
                continue;
            }
            if connection.send_text(&text) {
                success_count += 1;
            }
        }
        success_count
    }

    /// Unicast to one token's connection, if attached
    pub fn send_to(&self, token: &str, message: &ServerMessage) -> bool {
        let text = match serde_json::to_string(message) {
            Ok(text) => text,
            Err(e) => {
                log::error!("Failed to serialize unicast for room {}: {}", self.code, e);
                return false;
            }
        };
        self.connections
            .get(token)
            .map(|connection| connection.send_text(&text))
            .unwrap_or(false)
    }
}

/// Owns every live room, keyed by room code
pub struct RoomRegistry {
    pub(crate) rooms: RwLock<HashMap<String, Room>>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self {
            rooms: RwLock::new(HashMap::new()),
        }
    }

    /// Create a room and return its code and the host's token.
    /// The code is retried against existing keys under the write lock,
    /// so codes are unique among live rooms.
    pub async fn create_room(&self, time: f64) -> (String, String) {
        let time = time.max(0.0);
        let mut rooms = self.rooms.write().await;

        let code = loop {
            let candidate = IdentityGenerator::room_code();
            if !rooms.contains_key(&candidate) {
                break candidate;
            }
        };
        let host_token = IdentityGenerator::player_token();

        rooms.insert(
            code.clone(),
            Room::new(code.clone(), host_token.clone(), time),
        );
        log::info!("Room created: {} with time {}", code, time);

        (code, host_token)
    }

    /// Mint a token for a joining player and record the membership.
    /// The connection itself is attached later through the hub.
    pub async fn join_room(&self, code: &str) -> Result<(String, f64)> {
        let mut rooms = self.rooms.write().await;
        let room = rooms.get_mut(code).ok_or(ChessRelayError::RoomNotFound)?;

        let player_token = IdentityGenerator::player_token();
        room.members.push(player_token.clone());
        log::info!("Player {} joined room {}", player_token, code);

        Ok((player_token, room.time))
    }

    /// Delete a room. No-op if already absent.
    pub async fn remove(&self, code: &str) {
        self.rooms.write().await.remove(code);
    }

    pub async fn contains(&self, code: &str) -> bool {
        self.rooms.read().await.contains_key(code)
    }

    /// Number of live rooms, reported by the liveness probe
    pub async fn room_count(&self) -> usize {
        self.rooms.read().await.len()
    }

    pub async fn member_count(&self, code: &str) -> Option<usize> {
        self.rooms.read().await.get(code).map(Room::member_count)
    }

    pub async fn connection_count(&self, code: &str) -> Option<usize> {
        self.rooms
            .read()
            .await
            .get(code)
            .map(Room::connection_count)
    }

    pub async fn is_started(&self, code: &str) -> Option<bool> {
        self.rooms.read().await.get(code).map(|room| room.started)
    }
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared reference to the registry, passed into every connection task
pub type SharedRoomRegistry = Arc<RoomRegistry>;
