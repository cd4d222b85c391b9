//! CORS headers for browser clients.

use axum::http::{HeaderName, Method, header};
use tower_http::cors::{Any, CorsLayer};

/// Headers sent by AWS-signed and API-key clients.
const X_AMZ_DATE: HeaderName = HeaderName::from_static("x-amz-date");
const X_API_KEY: HeaderName = HeaderName::from_static("x-api-key");

/// Allows any origin to call the link endpoints.
///
/// Allowed request headers: `Content-Type`, `X-Amz-Date`, `Authorization`,
/// `X-Api-Key`.
pub fn layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, X_AMZ_DATE, header::AUTHORIZATION, X_API_KEY])
}
