use std::net::IpAddr;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: Option<String>,
    pub host: IpAddr,
    pub port: u16,
    pub store: StoreBackend,
    pub event_bus: EventBusBackend,
    pub event_bus_url: Option<String>,
    pub collection: String,
    pub topic: String,
    pub max_body_size: usize,
    pub log_level: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EventBusBackend {
    Postgres,
    Http,
    Memory,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. `from_env` passes the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let host: IpAddr = env_or("FEEDBACK_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid FEEDBACK_HOST: {e}"))?;

        // Knative and Cloud Run inject PORT
        let (port_var, port) = match (lookup("FEEDBACK_PORT"), lookup("PORT")) {
            (Some(port), _) => ("FEEDBACK_PORT", port),
            (None, Some(port)) => ("PORT", port),
            (None, None) => ("FEEDBACK_PORT", "8080".to_string()),
        };
        let port: u16 = port
            .parse()
            .map_err(|e| format!("Invalid {port_var}: {e}"))?;

        let store = match env_or("FEEDBACK_STORE", "postgres").as_str() {
            "postgres" => StoreBackend::Postgres,
            "memory" => StoreBackend::Memory,
            other => return Err(format!("Invalid FEEDBACK_STORE: {other}")),
        };

        let event_bus = match env_or("FEEDBACK_EVENT_BUS", "postgres").as_str() {
            "postgres" => EventBusBackend::Postgres,
            "http" => EventBusBackend::Http,
            "memory" => EventBusBackend::Memory,
            other => return Err(format!("Invalid FEEDBACK_EVENT_BUS: {other}")),
        };

        let database_url = lookup("DATABASE_URL").filter(|s| !s.is_empty());
        if database_url.is_none()
            && (store == StoreBackend::Postgres || event_bus == EventBusBackend::Postgres)
        {
            return Err("Missing required environment variable: DATABASE_URL".to_string());
        }

        let event_bus_url = lookup("FEEDBACK_EVENT_BUS_URL").filter(|s| !s.is_empty());
        if event_bus == EventBusBackend::Http && event_bus_url.is_none() {
            return Err("Missing required environment variable: FEEDBACK_EVENT_BUS_URL".to_string());
        }

        let collection = env_or("FEEDBACK_COLLECTION", "feedback");
        let topic = env_or("FEEDBACK_TOPIC", "feedback-created");

        let max_body_size: usize = env_or("FEEDBACK_MAX_BODY_SIZE", "1048576")
            .parse()
            .map_err(|e| format!("Invalid FEEDBACK_MAX_BODY_SIZE: {e}"))?;

        let log_level = env_or("FEEDBACK_LOG_LEVEL", "info");

        Ok(Config {
            database_url,
            host,
            port,
            store,
            event_bus,
            event_bus_url,
            collection,
            topic,
            max_body_size,
            log_level,
        })
    }
}
