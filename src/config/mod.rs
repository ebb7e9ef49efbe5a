mod types;

pub use types::*;

use crate::{Error, Result};
use std::collections::HashSet;
use std::env;
use std::path::Path;
use tracing::debug;

pub async fn load() -> Result<Config> {
    let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.yaml".to_string());

    let mut config = load_from(&config_path).await?;

    if let Ok(secret) = env::var("JWT_SECRET_KEY") {
        config.auth.secret_key = secret;
    }

    config.validate()?;
    Ok(config)
}

pub async fn load_from(path: impl AsRef<Path>) -> Result<Config> {
    let path = path.as_ref();
    debug!("Loading configuration from: {}", path.display());

    let config_str = tokio::fs::read_to_string(path).await?;
    parse(&config_str)
}

pub fn parse(yaml: &str) -> Result<Config> {
    let config: Config = serde_yaml::from_str(yaml)?;
    Ok(config)
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.auth.secret_key.trim().is_empty() {
            return Err(Error::config(
                "auth.secret_key is empty (set JWT_SECRET_KEY or auth.secret_key)",
            ));
        }

        if self.server.max_body_bytes == 0 {
            return Err(Error::config("server.max_body_bytes must be positive"));
        }

        if self.auth.token_ttl_minutes == 0 {
            return Err(Error::config("auth.token_ttl_minutes must be positive"));
        }

        if self.auth.users.is_empty() {
            return Err(Error::config("auth.users must define at least one account"));
        }

        let mut seen = HashSet::new();
        for user in &self.auth.users {
            if user.username.trim().is_empty() {
                return Err(Error::config("auth.users contains an empty username"));
            }
            if !seen.insert(user.username.as_str()) {
                return Err(Error::config(format!(
                    "auth.users contains duplicate username '{}'",
                    user.username
                )));
            }
        }

        if self.classifier.url.trim().is_empty() {
            return Err(Error::config("classifier.url is empty"));
        }

        Ok(())
    }
}
