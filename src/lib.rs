//! Chess Relay - a real-time session relay for online chess
//!
//! This library provides ephemeral game rooms, per-player identity
//! tokens, and best-effort fan-out of game messages between the
//! WebSocket connections attached to a room.

pub mod config;
pub mod constants;
pub mod core;
pub mod error;
pub mod handlers;

// Re-export main components
pub use config::*;
pub use constants::*;
