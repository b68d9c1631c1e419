use anyhow::Context;
use axum::Router;
use axum::extract::State;
use dotenv::dotenv;
use std::env;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

mod api;
mod app_env;
mod domain;
mod dto;
mod external_connections;
mod logging;
mod persistence;
mod routing_utils;

#[cfg(all(test, feature = "integration_test"))]
mod integration_test;

/// State shared across request handlers
pub struct SharedData {
    pub ext_cxn: persistence::ExternalConnectivity,
}

/// Extractor alias for pulling the shared state out of a request
pub type AppState = State<Arc<SharedData>>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    logging::setup_logging(logging::init_env_filter());

    let db_url = env::var(app_env::DB_URL)
        .with_context(|| format!("Could not get database URL from {}", app_env::DB_URL))?;
    let port: u16 = match env::var(app_env::SERVER_PORT) {
        Ok(raw_port) => raw_port
            .parse()
            .with_context(|| format!("{} must be a valid port number", app_env::SERVER_PORT))?,
        Err(_) => 8080,
    };

    let db_pool = persistence::connect_sqlx(&db_url).await?;
    let mut ext_cxn = persistence::ExternalConnectivity::new(db_pool);

    // A failure to bring up the schema leaves nothing to serve
    persistence::schema::initialize(&mut ext_cxn)
        .await
        .context("Database initialization failed")?;

    let router = Router::new()
        .merge(api::swagger_main::build_documentation())
        .nest("/todos", api::todo::todo_routes())
        .with_state(Arc::new(SharedData { ext_cxn }));
    let router = logging::attach_tracing_http(router);

    let listener = TcpListener::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("Could not bind to port {port}"))?;
    info!("Starting server on port {port}.");
    axum::serve(listener, router)
        .await
        .context("Server shut down unexpectedly")?;

    Ok(())
}
