//! Core functionality for the session relay

pub mod connection;
pub mod hub;
pub mod identity;
pub mod message;
pub mod room;

// Re-export main components for convenience
pub use connection::Connection;
pub use hub::ConnectionHub;
pub use identity::IdentityGenerator;
pub use message::{ClientMessage, MoveData, ServerMessage, Side, TimerData, TimerUpdate};
pub use room::{Room, RoomRegistry, SharedRoomRegistry};
