//! Liveness endpoint.

use axum::Json;

/// `GET /ping`: always answers `"pong!"`.
pub async fn ping_handler() -> Json<&'static str> {
    Json("pong!")
}
