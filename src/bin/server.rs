use log::{error, info, warn};
use std::convert::Infallible;
use std::sync::Arc;
use warp::{self, Filter};

use chess_relay::config::ServerConfig;
use chess_relay::constants::{CREATE_ROOM_PATH, HEALTH_PATH, JOIN_ROOM_PATH, WS_PATH};
use chess_relay::core::room::{RoomRegistry, SharedRoomRegistry};
use chess_relay::handlers;
use chess_relay::handlers::websocket::handle_ws_client;

#[tokio::main]
async fn main() {
    // Initialize env
    match dotenvy::dotenv() {
        Ok(_) => info!("Environment variables loaded from .env file"),
        Err(e) => warn!("Failed to load .env file: {}", e),
    };

    // Initialize logging
    env_logger::init();

    // Load config from environment
    let config = ServerConfig::from_env();
    info!("Configuration: host={}, port={}", config.host, config.port);

    // Create the shared room registry
    let registry: SharedRoomRegistry = Arc::new(RoomRegistry::new());

    // POST /create-room
    let create_route = warp::path(CREATE_ROOM_PATH)
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::json())
        .and(with_registry(registry.clone()))
        .and_then(handlers::rooms::create_room);

    // GET /join-room/{room_code}
    let join_route = warp::path(JOIN_ROOM_PATH)
        .and(warp::path::param::<String>())
        .and(warp::path::end())
        .and(warp::get())
        .and(with_registry(registry.clone()))
        .and_then(handlers::rooms::join_room);

    // GET /ws/{room_code}/{player_hash} -> WebSocket upgrade
    let ws_route = warp::path(WS_PATH)
        .and(warp::path::param::<String>())
        .and(warp::path::param::<String>())
        .and(warp::path::end())
        .and(warp::ws())
        .and(with_registry(registry.clone()))
        .map(
            |code: String, token: String, ws: warp::ws::Ws, registry: SharedRoomRegistry| {
                info!("New websocket connection for room {}", code);
                ws.on_upgrade(move |socket| handle_ws_client(socket, code, token, registry))
            },
        );

    // GET /health
    let health_route = warp::path(HEALTH_PATH)
        .and(warp::path::end())
        .and(warp::get())
        .and(with_registry(registry))
        .and_then(handlers::rooms::health);

    // Combine routes
    let routes = create_route.or(join_route).or(ws_route).or(health_route);

    // Build the server address
    let addr = match config.socket_addr() {
        Ok(addr) => addr,
        Err(e) => {
            error!("Failed to parse server address: {}", e);
            std::process::exit(1);
        }
    };

    // Start the server
    info!("Starting Chess Relay server on {}", addr);

    warp::serve(routes).run(addr).await;
}

// Helper function to include the registry in a request
fn with_registry(
    registry: SharedRoomRegistry,
) -> impl Filter<Extract = (SharedRoomRegistry,), Error = Infallible> + Clone {
    warp::any().map(move || registry.clone())
}
