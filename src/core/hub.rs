//! Per-room fan-out of inbound messages
//!
//! The hub owns the message protocol and its side effects on room state.
//! Every operation holds the registry write lock for its full duration,
//! so all mutations of a room are linearized. Outbound sends are
//! non-blocking channel pushes, so nothing slow runs under the lock.

use log::{debug, info, warn};
use tokio::sync::mpsc;
use warp::ws::Message;

use crate::core::message::{ClientMessage, ServerMessage, Side, TimerData};
use crate::core::room::{Room, SharedRoomRegistry};
use crate::error::{ChessRelayError, Result};

/// Dispatches inbound messages for attached connections and maintains
/// room membership as connections come and go
pub struct ConnectionHub {
    registry: SharedRoomRegistry,
}

impl ConnectionHub {
    pub fn new(registry: SharedRoomRegistry) -> Self {
        Self { registry }
    }

    /// Register a connection against its room and announce the new
    /// player count to everyone attached, the new connection included.
    pub async fn attach(
        &self,
        code: &str,
        token: &str,
        sender: mpsc::UnboundedSender<Message>,
    ) -> Result<()> {
        let mut rooms = self.registry.rooms.write().await;
        let room = rooms.get_mut(code).ok_or(ChessRelayError::RoomNotFound)?;

        room.attach(token.to_string(), sender);
        info!("Connection attached: {} in room {}", token, code);

        let update = ServerMessage::PlayerCountUpdated {
            player_count: room.member_count(),
        };
        room.broadcast(&update);
        Ok(())
    }

    /// Process one inbound text frame. Malformed frames are logged and
    /// dropped; authorization and precondition failures are answered with
    /// an in-band error to the sender only. The connection stays open in
    /// every case.
    pub async fn handle_text(&self, code: &str, token: &str, text: &str) {
        let message: ClientMessage = match serde_json::from_str(text) {
            Ok(message) => message,
            Err(e) => {
                let err = ChessRelayError::MessageParse(e.to_string());
                warn!(
                    "Dropping malformed message from {} in room {}: {}",
                    token, code, err
                );
                return;
            }
        };

        if let Err(e) = self.dispatch(code, token, message).await {
            match e {
                ChessRelayError::Unauthorized(msg) | ChessRelayError::PreconditionFailed(msg) => {
                    warn!("Rejected message from {} in room {}: {}", token, code, msg);
                    self.send_error(code, token, &msg).await;
                }
                other => warn!(
                    "Failed to handle message from {} in room {}: {}",
                    token, code, other
                ),
            }
        }
    }

    /// Remove a connection from its room, notify survivors of the new
    /// player count, and delete the room once no connections remain.
    /// Idempotent: repeated detaches for the same token are no-ops.
    pub async fn detach(&self, code: &str, token: &str) {
        let mut rooms = self.registry.rooms.write().await;

        let room_empty = match rooms.get_mut(code) {
            None => return,
            Some(room) => {
                if !room.detach(token) {
                    // already detached: no broadcast, no deletion check
                    return;
                }
                if room.connection_count() == 0 {
                    true
                } else {
                    let update = ServerMessage::PlayerCountUpdated {
                        player_count: room.member_count(),
                    };
                    room.broadcast(&update);
                    false
                }
            }
        };

        if room_empty {
            rooms.remove(code);
            info!("Room {} removed (no connections left)", code);
        }
    }

    async fn send_error(&self, code: &str, token: &str, message: &str) {
        let rooms = self.registry.rooms.read().await;
        if let Some(room) = rooms.get(code) {
            room.send_to(
                token,
                &ServerMessage::Error {
                    message: message.to_string(),
                },
            );
        }
    }

    async fn dispatch(&self, code: &str, token: &str, message: ClientMessage) -> Result<()> {
        let mut rooms = self.registry.rooms.write().await;
        let room = rooms.get_mut(code).ok_or(ChessRelayError::RoomNotFound)?;

        match message {
            ClientMessage::StartGame => Self::start_game(room, token),
            ClientMessage::Move { mv } => {
                room.broadcast_except(
                    &ServerMessage::Move {
                        player_hash: token.to_string(),
                        mv,
                    },
                    token,
                );
                debug!("Move broadcast in room {} by {}", code, token);
                Ok(())
            }
            ClientMessage::Resign => {
                room.broadcast(&ServerMessage::Resign {
                    player_hash: token.to_string(),
                });
                info!("Player {} resigned in room {}", token, code);
                Ok(())
            }
            ClientMessage::TimerSync { timer_data } => {
                if let Some(white) = timer_data.white_time_left {
                    room.white_time_left = white;
                }
                if let Some(black) = timer_data.black_time_left {
                    room.black_time_left = black;
                }
                if let Some(turn) = timer_data.is_whites_turn {
                    room.is_whites_turn = turn;
                }
                room.last_timer_update = chrono::Utc::now();

                if room.white_time_left <= 0.0 {
                    Self::announce_timeout(room, Side::White);
                } else if room.black_time_left <= 0.0 {
                    Self::announce_timeout(room, Side::Black);
                } else {
                    room.broadcast_except(
                        &ServerMessage::TimerSync {
                            timer_data: TimerData {
                                white_time_left: room.white_time_left,
                                black_time_left: room.black_time_left,
                                is_whites_turn: room.is_whites_turn,
                            },
                        },
                        token,
                    );
                    debug!("Timer sync broadcast in room {}", code);
                }
                Ok(())
            }
            ClientMessage::TimerTimeout { timeout_side } => {
                // The relay trusts the client-declared timeout
                Self::announce_timeout(room, timeout_side);
                Ok(())
            }
            ClientMessage::Unknown => {
                debug!("Ignoring unrecognized message type from {} in room {}", token, code);
                Ok(())
            }
        }
    }

    fn start_game(room: &mut Room, token: &str) -> Result<()> {
        if token != room.host_token {
            return Err(ChessRelayError::Unauthorized(
                "Only the host can start the game".to_string(),
            ));
        }
        if room.member_count() < 2 {
            return Err(ChessRelayError::PreconditionFailed(
                "There are not enough players".to_string(),
            ));
        }
        if room.started {
            return Err(ChessRelayError::PreconditionFailed(
                "The game has already started".to_string(),
            ));
        }

        // Host plays white; the first member that is not the host plays black
        let black_token = room
            .members
            .iter()
            .find(|member| **member != room.host_token)
            .cloned();

        room.started = true;
        room.white_token = Some(room.host_token.clone());
        room.black_token = black_token.clone();
        room.white_time_left = room.time;
        room.black_time_left = room.time;
        room.is_whites_turn = true;
        room.last_timer_update = chrono::Utc::now();

        room.send_to(
            &room.host_token,
            &ServerMessage::GameStarted {
                your_side: Side::White,
                is_your_turn: true,
            },
        );
        if let Some(ref black) = black_token {
            room.send_to(
                black,
                &ServerMessage::GameStarted {
                    your_side: Side::Black,
                    is_your_turn: false,
                },
            );
        }

        info!(
            "Game started in room {}: {} (white) vs {:?} (black)",
            room.code, room.host_token, black_token
        );
        Ok(())
    }

    fn announce_timeout(room: &Room, timeout_side: Side) {
        room.broadcast(&ServerMessage::TimerTimeout {
            timeout_side,
            winner_side: timeout_side.opponent(),
        });
        info!("{} timed out in room {}", timeout_side, room.code);
    }
}
