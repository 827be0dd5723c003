mod config;
mod constants;
mod handlers;
mod state;

use actix_web::{web, App, HttpServer};
use config::ServerConfig;
use state::AppState;
use tracing::{error, info, warn};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize tracing with env filter
    // Filter out actix-server worker shutdown messages
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(
                    "info,actix_server::worker=warn,actix_server::accept=warn",
                )
            }),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = ServerConfig::load().map_err(|e| {
        error!("Invalid configuration: {}", e);
        e
    })?;

    // Make sure we're saving to a valid directory before binding anything
    let state = AppState::from_config(&config).map_err(|e| {
        error!("{:#}, exiting", e);
        std::io::Error::new(std::io::ErrorKind::NotFound, format!("{:#}", e))
    })?;

    let bind_address = config.bind_address();
    info!("Listening on {}", bind_address);
    info!("Files will be saved to {:?}", state.save_dir.root());
    if let Some(secret) = config.secret.expose() {
        info!("Uploads must include the '{}' URL parameter", secret);
        if !config.secret.is_alphanumeric() {
            warn!(
                "Secret contains non-alphanumeric characters; this server might not be able to \
                 recognize it in requests"
            );
        }
    }

    let state = web::Data::new(state);
    let mut server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(handlers::configure)
    })
    .bind(&bind_address)
    .map_err(|e| {
        error!("Failed to bind to {}: {}", bind_address, e);
        e
    })?;

    if let Some(workers) = config.workers {
        server = server.workers(workers);
    }

    info!("Server bound successfully to http://{}", bind_address);

    // Runs until the process receives a shutdown signal
    server.run().await
}
