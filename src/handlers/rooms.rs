//! Room creation, joining, and the liveness probe

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use warp::http::StatusCode;

use crate::core::room::SharedRoomRegistry;

#[derive(Debug, Deserialize)]
pub struct CreateRoomRequest {
    pub time: f64,
}

#[derive(Debug, Serialize)]
pub struct CreateRoomResponse {
    pub room_code: String,
    pub host_hash: String,
}

#[derive(Debug, Serialize)]
pub struct JoinRoomResponse {
    pub player_hash: String,
    pub time: f64,
}

#[derive(Debug, Serialize)]
struct ErrorDetail {
    detail: &'static str,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    active_rooms: usize,
}

/// POST /create-room
pub async fn create_room(
    request: CreateRoomRequest,
    registry: SharedRoomRegistry,
) -> Result<impl warp::Reply, Infallible> {
    let (room_code, host_hash) = registry.create_room(request.time).await;
    Ok(warp::reply::json(&CreateRoomResponse {
        room_code,
        host_hash,
    }))
}

/// GET /join-room/{room_code}
pub async fn join_room(
    room_code: String,
    registry: SharedRoomRegistry,
) -> Result<impl warp::Reply, Infallible> {
    match registry.join_room(&room_code).await {
        Ok((player_hash, time)) => Ok(warp::reply::with_status(
            warp::reply::json(&JoinRoomResponse { player_hash, time }),
            StatusCode::OK,
        )),
        Err(e) => {
            log::warn!("Join rejected for room {}: {}", room_code, e);
            Ok(warp::reply::with_status(
                warp::reply::json(&ErrorDetail {
                    detail: "Room not found",
                }),
                StatusCode::NOT_FOUND,
            ))
        }
    }
}

/// GET /health
pub async fn health(registry: SharedRoomRegistry) -> Result<impl warp::Reply, Infallible> {
    Ok(warp::reply::json(&HealthResponse {
        status: "healthy",
        active_rooms: registry.room_count().await,
    }))
}
