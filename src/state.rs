//! Shared application state injected into handlers.

use std::sync::Arc;

use crate::application::services::LinkService;
use crate::domain::repositories::LinkRepository;

/// Link service over whichever backend was configured at startup.
pub type DynLinkService = LinkService<dyn LinkRepository>;

/// State shared by all handlers.
///
/// Cheap to clone; contains only the service handle. No per-request mutable
/// state lives here.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<DynLinkService>,
}

impl AppState {
    pub fn new(link_service: Arc<DynLinkService>) -> Self {
        Self { link_service }
    }
}
