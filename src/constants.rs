// Fundamental configuration constants
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;

// Route path segments
pub const CREATE_ROOM_PATH: &str = "create-room";
pub const JOIN_ROOM_PATH: &str = "join-room";
pub const WS_PATH: &str = "ws";
pub const HEALTH_PATH: &str = "health";

// Identity sizes
pub const ROOM_CODE_LEN: usize = 6;
pub const PLAYER_TOKEN_BYTES: usize = 16;

// WebSocket close code sent when a connection targets an unknown room
pub const CLOSE_ROOM_NOT_FOUND: u16 = 4004;
