// routes.rs
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::store::PollStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn PollStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn PollStore>) -> Self {
        Self { store }
    }
}

pub fn create_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/polls/", get(handlers::index))
        .route("/polls/{id}/", get(handlers::detail))
        .route("/polls/{id}/vote", post(handlers::vote))
        .route("/polls/{id}/results", get(handlers::results))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
