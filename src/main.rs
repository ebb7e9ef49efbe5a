use anyhow::{Context, Result};
use emotion_api::{config, config::Config, server};
use tracing::info;
use tracing_subscriber::{EnvFilter, filter::LevelFilter};

/// Resolves the log filter, `RUST_LOG` first, and installs the JSON subscriber.
fn init_logging(config: &Config) -> Result<String> {
    let level = std::env::var("RUST_LOG").unwrap_or_else(|_| config.server.logs.level.clone());

    level.parse::<LevelFilter>().map_err(|_| {
        anyhow::anyhow!(
            "Invalid log level: '{}'. Valid levels: error, warn, info, debug, trace",
            level
        )
    })?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&level))
        .json()
        .init();

    Ok(level)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logging depends on config, so config errors go to stderr
    let config = match config::load().await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let log_level = match init_logging(&config) {
        Ok(level) => level,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    info!(
        log_level = %log_level,
        classifier = %config.classifier.url,
        accounts = config.auth.users.len(),
        prediction_roles = ?config.auth.prediction_roles,
        "Starting emotion detection API"
    );

    server::run(config)
        .await
        .context("emotion detection API stopped")?;

    Ok(())
}
