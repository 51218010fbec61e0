//! Request handlers for the relay's HTTP and WebSocket endpoints

pub mod rooms;
pub mod websocket;

// Re-export the websocket handler
pub use websocket::handle_ws_client;
