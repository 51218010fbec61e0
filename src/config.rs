//! Server configuration module
//! Handles runtime configuration parameters for the relay server

use crate::constants::{DEFAULT_HOST, DEFAULT_PORT};
use crate::error::{ChessRelayError, Result};
use std::env;
use std::net::SocketAddr;

/// Server configuration parameters
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// Load configuration from environment variables if available
    pub fn from_env() -> Self {
        let host = env::var("CHESS_RELAY_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
        let port = env::var("CHESS_RELAY_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        Self { host, port }
    }

    /// Resolve the bind address for the server
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| ChessRelayError::Config(format!("Invalid bind address: {}", e)))
    }
}
