use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum ChessRelayError {
    // Room errors
    RoomNotFound,

    // In-band protocol errors, scoped to one connection
    Unauthorized(String),
    PreconditionFailed(String),

    // Message errors
    MessageParse(String),

    // Connection errors
    Transport(String),

    // Configuration errors
    Config(String),
}

impl fmt::Display for ChessRelayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RoomNotFound => write!(f, "Room not found"),
            Self::Unauthorized(msg) => write!(f, "{}", msg),
            Self::PreconditionFailed(msg) => write!(f, "{}", msg),
            Self::MessageParse(msg) => write!(f, "Message parse error: {}", msg),
            Self::Transport(msg) => write!(f, "Transport error: {}", msg),
            Self::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl Error for ChessRelayError {}

// Generic result type for the relay
pub type Result<T> = std::result::Result<T, ChessRelayError>;
