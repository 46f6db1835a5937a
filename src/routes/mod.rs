pub mod ingest;

use axum::routing::{get, post};
use axum::Router;

use crate::state::SharedState;

pub fn ingest_routes() -> Router<SharedState> {
    Router::new().route("/", post(ingest::ingest))
}

pub fn health_routes() -> Router<SharedState> {
    Router::new().route("/health", get(health))
}

async fn health() -> &'static str {
    "ok"
}
