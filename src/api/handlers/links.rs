//! Handlers for link endpoints (create, resolve, list).

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::link::{CreateLinkRequest, LinkResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link.
///
/// # Endpoint
///
/// `POST /links`
///
/// # Request Body
///
/// ```json
/// {
///   "url": "https://example.com",
///   "id": "my-link"   // optional custom hash
/// }
/// ```
///
/// # Response
///
/// `201 Created` with `{ "id", "url", "createdAt" }`.
///
/// # Errors
///
/// - 400 if the body is malformed, `url` is not a web URL, or `id` is invalid or taken
/// - 503 if a generated hash collided (retry)
/// - 500 on store failure
pub async fn create_link_handler(
    State(state): State<AppState>,
    payload: Result<Json<CreateLinkRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<LinkResponse>), AppError> {
    let Json(payload) = payload.map_err(|rejection| {
        AppError::bad_request(format!("Validation error: {}", rejection.body_text()))
    })?;
    payload.validate()?;

    let link = state
        .link_service
        .create_link(payload.url, payload.id)
        .await?;

    Ok((StatusCode::CREATED, Json(link.into())))
}

/// Resolves a short link by its hash.
///
/// # Endpoint
///
/// `GET /links/{id}`
///
/// `/links/` is normalized to `/links` and served by [`list_links_handler`],
/// so an empty `id` never reaches this handler; the service's empty-id check
/// only guards direct callers such as the admin CLI.
///
/// # Errors
///
/// - 404 if no link has this hash
/// - 500 on store failure
pub async fn get_link_handler(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<LinkResponse>, AppError> {
    let link = state.link_service.get_link(&id).await?;
    Ok(Json(link.into()))
}

/// Lists the 30 most recent links, newest first.
///
/// # Endpoint
///
/// `GET /links`
pub async fn list_links_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<LinkResponse>>, AppError> {
    let links = state.link_service.list_links().await?;
    Ok(Json(links.into_iter().map(LinkResponse::from).collect()))
}
