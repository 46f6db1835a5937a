use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, StatusCode};
use serde_json::Value;

use feedback_intake::config::{Config, EventBusBackend, StoreBackend};
use feedback_intake::events::{EventPublisher, MemoryPublisher, PublishError};
use feedback_intake::store::{DocumentStore, MemoryStore, StoreError};

pub const COLLECTION: &str = "feedback";
pub const TOPIC: &str = "feedback-created";

/// A running test server instance.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Submit a JSON body to the intake endpoint, return (body text, status).
    pub async fn submit_json(&self, data: &Value) -> (String, StatusCode) {
        let resp = self
            .client
            .post(self.url("/"))
            .json(data)
            .send()
            .await
            .expect("submit json failed");
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        (body, status)
    }

    /// Submit form-urlencoded data, return (body text, status).
    pub async fn submit_form(&self, data: &[(&str, &str)]) -> (String, StatusCode) {
        let resp = self
            .client
            .post(self.url("/"))
            .form(data)
            .send()
            .await
            .expect("submit form failed");
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        (body, status)
    }

    /// Submit a raw body with an explicit content type.
    pub async fn submit_raw(&self, content_type: &str, body: &'static str) -> (String, StatusCode) {
        let resp = self
            .client
            .post(self.url("/"))
            .header("content-type", content_type)
            .body(body)
            .send()
            .await
            .expect("submit raw failed");
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        (body, status)
    }
}

pub fn test_config() -> Config {
    Config {
        database_url: None,
        host: "127.0.0.1".parse().unwrap(),
        port: 0, // unused, we bind to random port
        store: StoreBackend::Memory,
        event_bus: EventBusBackend::Memory,
        event_bus_url: None,
        collection: COLLECTION.to_string(),
        topic: TOPIC.to_string(),
        max_body_size: 16 * 1024,
        log_level: "warn".to_string(),
    }
}

/// Spawn a test app backed by the given store and publisher.
pub async fn spawn_app_with(
    store: Arc<dyn DocumentStore>,
    publisher: Arc<dyn EventPublisher>,
) -> TestApp {
    let app = feedback_intake::build_app(test_config(), store, publisher);

    // Bind to random port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    TestApp {
        addr,
        client: Client::new(),
    }
}

/// Spawn a test app with fresh in-memory backends, returned for inspection.
pub async fn spawn_app() -> (TestApp, Arc<MemoryStore>, Arc<MemoryPublisher>) {
    let store = Arc::new(MemoryStore::new());
    let publisher = Arc::new(MemoryPublisher::new());
    let app = spawn_app_with(store.clone(), publisher.clone()).await;
    (app, store, publisher)
}

/// Decode a published notification payload.
pub fn event_id(payload: &Bytes) -> String {
    let value: Value = serde_json::from_slice(payload).expect("event payload is not JSON");
    value["newFeedbackId"]
        .as_str()
        .expect("event payload has no newFeedbackId")
        .to_string()
}

/// Store whose writes always fail.
#[derive(Default)]
pub struct FailingStore {
    pub attempts: AtomicUsize,
}

#[async_trait]
impl DocumentStore for FailingStore {
    async fn put(&self, _collection: &str, _key: &str, _document: &Value) -> Result<(), StoreError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(StoreError::Unavailable("simulated outage".to_string()))
    }

    async fn get(&self, _collection: &str, _key: &str) -> Result<Option<Value>, StoreError> {
        Ok(None)
    }
}

/// Publisher whose publishes always fail.
#[derive(Default)]
pub struct FailingPublisher {
    pub attempts: AtomicUsize,
}

#[async_trait]
impl EventPublisher for FailingPublisher {
    async fn publish(&self, topic: &str, _payload: Bytes) -> Result<(), PublishError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(PublishError::new(topic, "simulated outage"))
    }
}

/// Publisher that checks, at publish time, that the announced record is
/// already readable from the store.
pub struct ReadBackPublisher {
    pub store: Arc<MemoryStore>,
    pub seen: Mutex<Vec<(String, bool)>>,
}

impl ReadBackPublisher {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self {
            store,
            seen: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl EventPublisher for ReadBackPublisher {
    async fn publish(&self, _topic: &str, payload: Bytes) -> Result<(), PublishError> {
        let id = event_id(&payload);
        let present = self
            .store
            .get(COLLECTION, &id)
            .await
            .map(|doc| doc.is_some())
            .unwrap_or(false);
        self.seen.lock().unwrap().push((id, present));
        Ok(())
    }
}
