mod service;
mod store;
mod token;

pub use service::*;
pub use store::*;
pub use token::*;

use crate::{Result, config::AuthConfig};
use chrono::Duration;
use std::sync::Arc;

/// Builds the auth service from config: hashes the credential table and
/// keys the token service with the configured secret.
pub fn from_config(config: &AuthConfig) -> Result<AuthService> {
    let store = InMemoryUserStore::from_config(&config.users)?;
    let ttl = Duration::minutes(config.token_ttl_minutes as i64);
    let tokens = TokenService::new(&config.secret_key, ttl);

    AuthService::new(Arc::new(store), tokens, config.prediction_roles.clone())
}
