//! Link API route configuration.

use crate::api::handlers::{create_link_handler, get_link_handler, list_links_handler};
use crate::state::AppState;
use axum::{Router, routing::get};

/// Link routes.
///
/// # Endpoints
///
/// - `GET  /links`       - 30 most recent links, newest first
/// - `POST /links`       - Create a link (optionally with a custom id)
/// - `GET  /links/{id}`  - Resolve a link
pub fn link_routes() -> Router<AppState> {
    Router::new()
        .route("/links", get(list_links_handler).post(create_link_handler))
        .route("/links/{id}", get(get_link_handler))
}
