use std::net::SocketAddr;
use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tokio::signal;
use tracing_subscriber::EnvFilter;

use feedback_intake::config::{Config, EventBusBackend, StoreBackend};
use feedback_intake::events::{EventPublisher, HttpPublisher, MemoryPublisher, PgNotifyPublisher};
use feedback_intake::store::{DocumentStore, MemoryStore, PgDocumentStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(&config.log_level)
        }))
        .init();

    tracing::info!("Starting feedback intake");

    // One pool shared by every Postgres-backed collaborator
    let pool = match &config.database_url {
        Some(url)
            if config.store == StoreBackend::Postgres
                || config.event_bus == EventBusBackend::Postgres =>
        {
            let pool = PgPoolOptions::new()
                .max_connections(10)
                .connect(url)
                .await?;

            sqlx::migrate!("./migrations").run(&pool).await?;
            tracing::info!("Migrations applied");

            Some(pool)
        }
        _ => None,
    };

    let store: Arc<dyn DocumentStore> = match (config.store, &pool) {
        (StoreBackend::Postgres, Some(pool)) => Arc::new(PgDocumentStore::new(pool.clone())),
        (StoreBackend::Postgres, None) => return Err("Postgres store requires DATABASE_URL".into()),
        (StoreBackend::Memory, _) => {
            tracing::warn!("Using in-memory document store, records are lost on exit");
            Arc::new(MemoryStore::new())
        }
    };

    let publisher: Arc<dyn EventPublisher> = match (config.event_bus, &pool) {
        (EventBusBackend::Postgres, Some(pool)) => Arc::new(PgNotifyPublisher::new(pool.clone())),
        (EventBusBackend::Postgres, None) => {
            return Err("Postgres event bus requires DATABASE_URL".into());
        }
        (EventBusBackend::Http, _) => {
            let url = config
                .event_bus_url
                .as_deref()
                .ok_or("HTTP event bus requires FEEDBACK_EVENT_BUS_URL")?;
            Arc::new(HttpPublisher::new(url)?)
        }
        (EventBusBackend::Memory, _) => {
            tracing::warn!("Using in-memory event publisher, events are not delivered");
            Arc::new(MemoryPublisher::new())
        }
    };

    tracing::info!(
        collection = %config.collection,
        topic = %config.topic,
        store = ?config.store,
        event_bus = ?config.event_bus,
        "Backends ready"
    );

    let addr = SocketAddr::new(config.host, config.port);
    let app = feedback_intake::build_app(config, store, publisher);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server closed");
    close_pool(pool).await;

    Ok(())
}

async fn close_pool(pool: Option<PgPool>) {
    if let Some(pool) = pool {
        pool.close().await;
        tracing::info!("Database pool closed");
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received SIGINT"),
        _ = terminate => tracing::info!("Received SIGTERM"),
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
