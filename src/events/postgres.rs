use async_trait::async_trait;
use bytes::Bytes;
use sqlx::PgPool;

use super::{EventPublisher, PublishError};

/// Publishes through `pg_notify`, using the topic as the channel name.
/// Listeners `LISTEN "feedback-created"` to receive payloads.
pub struct PgNotifyPublisher {
    pool: PgPool,
}

impl PgNotifyPublisher {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventPublisher for PgNotifyPublisher {
    async fn publish(&self, topic: &str, payload: Bytes) -> Result<(), PublishError> {
        let payload = std::str::from_utf8(&payload)
            .map_err(|e| PublishError::new(topic, format!("Payload is not UTF-8: {e}")))?;

        sqlx::query("SELECT pg_notify($1, $2)")
            .bind(topic)
            .bind(payload)
            .execute(&self.pool)
            .await
            .map_err(|e| PublishError::new(topic, format!("Database error: {e}")))?;

        Ok(())
    }
}
