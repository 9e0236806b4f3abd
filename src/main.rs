//! Meta-Transaction Relayer
//!
//! Starts the development network, the relayer service and its HTTP API.
//!
//! # Environment Variables
//!
//! - `HOST` / `PORT`: server bind address
//! - `CONFIG_FILE_PATH`: location of the JSON configuration
//! - `RELAYER_PRIVATE_KEY`: hex secp256k1 key paying for envelopes
//! - `SUBMISSION_TIMEOUT_MS` / `RECEIPT_POLL_INTERVAL_MS` / `BLOCK_TIME_MS`: relay timing
//! - `LOG_MODE` / `LOG_LEVEL` / `LOG_FILE_PATH`: logging
use std::time::Duration;

use actix_web::{middleware, middleware::Logger, App, HttpServer};
use color_eyre::Result;
use dotenvy::dotenv;
use log::info;

use metatx_relayer::{api, bootstrap::initialize_app_state, config, logging::setup_logging};

#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenv().ok();
    setup_logging()?;

    let server_config = config::ServerConfig::from_env();
    let config_file = config::load_config(&server_config.config_file_path)?;
    info!("Config: {:?}", config_file);

    let (app_state, _network) = initialize_app_state(&server_config, &config_file).await?;

    let block_producer = if config_file.network.auto_mine {
        None
    } else {
        Some(
            app_state
                .0
                .provider
                .spawn_block_producer(Duration::from_millis(server_config.block_time_ms)),
        )
    };

    info!(
        "Starting server on {}:{}",
        server_config.host, server_config.port
    );
    let server = HttpServer::new(move || {
        App::new()
            .wrap(middleware::Compress::default())
            .wrap(middleware::NormalizePath::trim())
            .wrap(middleware::DefaultHeaders::new())
            .wrap(Logger::default())
            .app_data(app_state.clone())
            .configure(api::routes::configure_routes)
    })
    .bind((server_config.host.as_str(), server_config.port))?
    .shutdown_timeout(5);

    server.run().await?;

    if let Some(handle) = block_producer {
        handle.abort();
    }
    Ok(())
}
