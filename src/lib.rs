pub mod config;
pub mod error;
pub mod events;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;
pub mod submission;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderName, HeaderValue};
use axum::Router;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::events::EventPublisher;
use crate::state::{AppState, SharedState};
use crate::store::DocumentStore;

pub fn build_app(
    config: Config,
    store: Arc<dyn DocumentStore>,
    publisher: Arc<dyn EventPublisher>,
) -> Router {
    let max_body_size = config.max_body_size;

    let state: SharedState = Arc::new(AppState {
        config,
        store,
        publisher,
    });

    Router::new()
        .merge(routes::ingest_routes())
        .merge(routes::health_routes())
        .layer(DefaultBodyLimit::max(max_body_size))
        .layer(TraceLayer::new_for_http())
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-content-type-options"),
            HeaderValue::from_static("nosniff"),
        ))
        .with_state(state)
}
