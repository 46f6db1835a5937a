use async_trait::async_trait;
use bytes::Bytes;

use super::{EventPublisher, PublishError};

/// Pushes each event as a JSON POST to `{base_url}/{topic}`.
pub struct HttpPublisher {
    client: reqwest::Client,
    base_url: String,
}

impl HttpPublisher {
    pub fn new(base_url: &str) -> Result<Self, String> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| format!("Failed to build HTTP client: {e}"))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn topic_url(&self, topic: &str) -> String {
        format!("{}/{}", self.base_url, topic)
    }
}

#[async_trait]
impl EventPublisher for HttpPublisher {
    async fn publish(&self, topic: &str, payload: Bytes) -> Result<(), PublishError> {
        let resp = self
            .client
            .post(self.topic_url(topic))
            .header("Content-Type", "application/json")
            .body(payload)
            .send()
            .await
            .map_err(|e| PublishError::new(topic, format!("Request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp
                .text()
                .await
                .unwrap_or_default()
                .chars()
                .take(256)
                .collect::<String>();
            return Err(PublishError::new(
                topic,
                format!("Bus responded {}: {body}", status.as_u16()),
            ));
        }

        Ok(())
    }
}
