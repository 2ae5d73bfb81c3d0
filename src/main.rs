//! insta-dl server entry point.
//!
//! Startup order:
//! 1. Load `.env` (if present) and build the configuration from the environment.
//! 2. Initialise tracing (JSON or human-readable).
//! 3. Open the database, prepare the download directory, pick a fetcher.
//! 4. Serve HTTP until SIGTERM/SIGINT, then close the database.

use insta_dl::{Config, VideoDownloader};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env is fine; the environment and defaults still apply
    let dotenv = dotenvy::dotenv();

    let config = Config::from_env()?;
    init_tracing(&config);

    match dotenv {
        Ok(path) => tracing::debug!(path = %path.display(), "Loaded .env file"),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!(error = %e, "Failed to read .env file"),
    }

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "insta-dl starting");

    let downloader = Arc::new(VideoDownloader::new(config.clone()).await?);
    tracing::info!(
        database_url = %config.persistence.database_url,
        fetcher = downloader.fetcher_name(),
        "Database ready"
    );

    let result = insta_dl::api::start_api_server(downloader.clone(), Arc::new(config)).await;

    downloader.shutdown().await;
    tracing::info!("insta-dl stopped");

    result.map_err(Into::into)
}

/// Install the global tracing subscriber
///
/// `RUST_LOG` wins over the configured filter; an invalid configured filter
/// falls back to `info`.
fn init_tracing(config: &Config) {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => match config.log.filter.parse::<EnvFilter>() {
            Ok(filter) => filter,
            Err(e) => {
                eprintln!(
                    "WARN: INSTA_DL_LOG='{}' is not a valid tracing filter ({}); \
                     falling back to 'info'",
                    config.log.filter, e
                );
                EnvFilter::new("info")
            }
        },
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true);

    if config.log.json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}
