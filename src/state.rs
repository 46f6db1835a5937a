use std::sync::Arc;

use crate::config::Config;
use crate::events::EventPublisher;
use crate::store::DocumentStore;

pub type SharedState = Arc<AppState>;

/// Created once at startup and shared by every request. The store and
/// publisher are long-lived connections, safe for concurrent use.
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn DocumentStore>,
    pub publisher: Arc<dyn EventPublisher>,
}
