//! # TaskHive API Server
//!
//! This is the main API server for TaskHive, a multi-tenant project
//! collaboration backend: projects, memberships, tasks, subtasks, notes,
//! documents and notifications behind a role-based access model.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p taskhive-api
//! ```

use std::sync::Arc;

use taskhive_api::{
    app::{build_router, AppState},
    config::Config,
};
use taskhive_shared::blob::HttpBlobStore;
use taskhive_shared::db::{migrations, pool};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskhive_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "TaskHive API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;

    let db = pool::create_pool(pool::DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    })
    .await?;

    migrations::run_migrations(&db).await?;

    let blob = Arc::new(HttpBlobStore::new(
        config.blob.base_url.clone(),
        config.blob.api_key.clone(),
    ));

    let bind_address = config.bind_address();
    let state = AppState::new(db, blob, config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutdown signal received, exiting...");
    Ok(())
}

async fn shutdown_signal() {
    // Best effort; if the signal handler cannot be installed we simply never
    // shut down gracefully.
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install shutdown signal handler: {}", e);
        std::future::pending::<()>().await;
    }
}
