#![allow(dead_code)]

use axum_test::TestServer;
use link_shortener::application::services::{LinkService, ServiceSettings};
use link_shortener::domain::repositories::LinkRepository;
use link_shortener::infrastructure::persistence::MemoryLinkRepository;
use link_shortener::routes::router;
use link_shortener::state::AppState;
use std::sync::Arc;

pub fn create_test_state(repository: Arc<dyn LinkRepository>) -> AppState {
    create_test_state_with(repository, ServiceSettings::default())
}

pub fn create_test_state_with(
    repository: Arc<dyn LinkRepository>,
    settings: ServiceSettings,
) -> AppState {
    let link_service = LinkService::new(repository, settings);
    AppState::new(Arc::new(link_service))
}

/// Full application router over an empty in-memory store.
pub fn make_server() -> (TestServer, Arc<MemoryLinkRepository>) {
    let repository = Arc::new(MemoryLinkRepository::new());
    let state = create_test_state(repository.clone());
    let server = TestServer::new(router(state)).unwrap();
    (server, repository)
}

pub fn make_server_with(repository: Arc<dyn LinkRepository>) -> TestServer {
    TestServer::new(router(create_test_state(repository))).unwrap()
}
