use serde::{Deserialize, Serialize};
use std::fmt;

/// Board side a player was assigned at game start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    White,
    Black,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::White => write!(f, "white"),
            Side::Black => write!(f, "black"),
        }
    }
}

fn absent_square() -> i32 {
    -1
}

/// A relayed move: primary from/to squares plus an optional second pair
/// for two-square moves (castling, en passant). -1 marks an absent
/// coordinate, matching the client protocol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveData {
    pub from_rank: i32,
    pub from_file: i32,
    pub to_rank: i32,
    pub to_file: i32,
    #[serde(default = "absent_square")]
    pub from2_rank: i32,
    #[serde(default = "absent_square")]
    pub from2_file: i32,
    #[serde(default = "absent_square")]
    pub to2_rank: i32,
    #[serde(default = "absent_square")]
    pub to2_file: i32,
}

/// Inbound timer state; absent fields keep the room's prior values
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimerUpdate {
    pub white_time_left: Option<f64>,
    pub black_time_left: Option<f64>,
    pub is_whites_turn: Option<bool>,
}

/// Outbound timer state, always fully populated from the room
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerData {
    pub white_time_left: f64,
    pub black_time_left: f64,
    pub is_whites_turn: bool,
}

/// Messages received from clients over an attached connection
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    StartGame,
    Move {
        #[serde(rename = "move")]
        mv: MoveData,
    },
    Resign,
    TimerSync {
        timer_data: TimerUpdate,
    },
    TimerTimeout {
        timeout_side: Side,
    },
    /// Any unrecognized message type; ignored by the relay
    #[serde(other)]
    Unknown,
}

/// Messages sent to clients
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    PlayerCountUpdated {
        player_count: usize,
    },
    GameStarted {
        your_side: Side,
        is_your_turn: bool,
    },
    Error {
        message: String,
    },
    Move {
        player_hash: String,
        #[serde(rename = "move")]
        mv: MoveData,
    },
    Resign {
        player_hash: String,
    },
    TimerSync {
        timer_data: TimerData,
    },
    TimerTimeout {
        timeout_side: Side,
        winner_side: Side,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn test_side_opponent() {
        assert_eq!(Side::White.opponent(), Side::Black);
        assert_eq!(Side::Black.opponent(), Side::White);
    }

    #[test]
    fn test_move_second_pair_defaults_absent() {
        let msg: ClientMessage = serde_json::from_str(
            r#"{"type":"move","move":{"from_rank":1,"from_file":4,"to_rank":3,"to_file":4}}"#,
        )
        .unwrap();
        match msg {
            ClientMessage::Move { mv } => {
                assert_eq!(mv.from_rank, 1);
                assert_eq!(mv.to_file, 4);
                assert_eq!(mv.from2_rank, -1);
                assert_eq!(mv.to2_file, -1);
            }
            other => panic!("parsed wrong variant: {:?}", other),
        }
    }

    #[test]
    fn test_move_missing_primary_square_is_error() {
        let result: Result<ClientMessage, _> =
            serde_json::from_str(r#"{"type":"move","move":{"from_rank":1}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_timer_sync_fields_optional() {
        let msg: ClientMessage = serde_json::from_str(
            r#"{"type":"timer_sync","timer_data":{"white_time_left":42.5}}"#,
        )
        .unwrap();
        match msg {
            ClientMessage::TimerSync { timer_data } => {
                assert_eq!(timer_data.white_time_left, Some(42.5));
                assert_eq!(timer_data.black_time_left, None);
                assert_eq!(timer_data.is_whites_turn, None);
            }
            other => panic!("parsed wrong variant: {:?}", other),
        }
    }

    #[test]
    fn test_unrecognized_type_parses_to_unknown() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"type":"chat","text":"hello"}"#).unwrap();
        assert!(matches!(msg, ClientMessage::Unknown));
    }

    #[test]
    fn test_game_started_wire_shape() {
        let msg = ServerMessage::GameStarted {
            your_side: Side::White,
            is_your_turn: true,
        };
        let value: Value = serde_json::to_value(&msg).unwrap();
        assert_eq!(
            value,
            json!({"type": "game_started", "your_side": "white", "is_your_turn": true})
        );
    }

    #[test]
    fn test_timer_timeout_wire_shape() {
        let msg = ServerMessage::TimerTimeout {
            timeout_side: Side::White,
            winner_side: Side::Black,
        };
        let value: Value = serde_json::to_value(&msg).unwrap();
        assert_eq!(
            value,
            json!({"type": "timer_timeout", "timeout_side": "white", "winner_side": "black"})
        );
    }

    #[test]
    fn test_move_broadcast_keeps_sentinels() {
        let msg = ServerMessage::Move {
            player_hash: "abc".to_string(),
            mv: MoveData {
                from_rank: 6,
                from_file: 3,
                to_rank: 4,
                to_file: 3,
                from2_rank: -1,
                from2_file: -1,
                to2_rank: -1,
                to2_file: -1,
            },
        };
        let value: Value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["type"], "move");
        assert_eq!(value["player_hash"], "abc");
        assert_eq!(value["move"]["from2_rank"], -1);
        assert_eq!(value["move"]["to_rank"], 4);
    }
}
