use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;

use super::{EventPublisher, PublishError};

/// Keeps every published event in memory, in publish order.
#[derive(Default)]
pub struct MemoryPublisher {
    published: Mutex<Vec<(String, Bytes)>>,
}

impl MemoryPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn published(&self) -> Vec<(String, Bytes)> {
        self.published
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl EventPublisher for MemoryPublisher {
    async fn publish(&self, topic: &str, payload: Bytes) -> Result<(), PublishError> {
        let mut events = self
            .published
            .lock()
            .map_err(|_| PublishError::new(topic, "event log poisoned"))?;
        events.push((topic.to_string(), payload));
        Ok(())
    }
}
