//! Event bus publishing.
//!
//! Publishers are fire-and-acknowledge: `publish` returns once the bus has
//! accepted the payload. Delivery and ordering past that point belong to the bus.

pub mod http;
pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use bytes::Bytes;

pub use http::HttpPublisher;
pub use memory::MemoryPublisher;
pub use postgres::PgNotifyPublisher;

#[derive(Debug)]
pub struct PublishError {
    pub topic: String,
    pub message: String,
}

impl PublishError {
    pub fn new(topic: &str, message: impl Into<String>) -> Self {
        Self {
            topic: topic.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for PublishError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Publish to '{}' failed: {}", self.topic, self.message)
    }
}

impl std::error::Error for PublishError {}

#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, topic: &str, payload: Bytes) -> Result<(), PublishError>;
}
