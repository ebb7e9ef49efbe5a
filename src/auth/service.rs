use super::{
    store::{UserStore, hash_password, verify_password},
    token::{TOKEN_TYPE, TokenService},
};
use crate::{Error, Result};
use std::sync::Arc;
use tracing::{info, warn};

const BAD_CREDENTIALS: &str = "Incorrect username or password";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub access_token: String,
    pub token_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub username: String,
    pub role: String,
}

pub struct AuthService {
    store: Arc<dyn UserStore>,
    tokens: TokenService,
    prediction_roles: Vec<String>,
    // Verified against when the username is unknown so both failure paths
    // do the same amount of hashing work.
    dummy_hash: String,
}

impl AuthService {
    pub fn new(
        store: Arc<dyn UserStore>,
        tokens: TokenService,
        prediction_roles: Vec<String>,
    ) -> Result<Self> {
        Ok(Self {
            store,
            tokens,
            prediction_roles,
            dummy_hash: hash_password("emotion-api-dummy-password")?,
        })
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<AccessToken> {
        let user = self.store.find_by_username(username).await?;

        let valid = match &user {
            Some(record) => verify_password(password, &record.password_hash),
            None => {
                let _ = verify_password(password, &self.dummy_hash);
                false
            }
        };

        if !valid {
            warn!("Login failed for username: {}", username);
            return Err(Error::unauthorized(BAD_CREDENTIALS));
        }

        let access_token = self.tokens.issue(username)?;
        info!("Issued access token for user: {}", username);

        Ok(AccessToken {
            access_token,
            token_type: TOKEN_TYPE.to_string(),
        })
    }

    pub fn verify(&self, token: &str) -> Result<String> {
        self.tokens.verify(token)
    }

    /// Verifies the token, resolves its subject, and checks the subject's
    /// role against the roles allowed to call prediction endpoints.
    pub async fn authorize(&self, token: &str) -> Result<AuthenticatedUser> {
        let username = self.verify(token)?;

        let Some(record) = self.store.find_by_username(&username).await? else {
            warn!("Token subject no longer exists: {}", username);
            return Err(Error::unauthorized("Invalid token"));
        };

        if !self.prediction_roles.iter().any(|r| r == &record.role) {
            warn!(
                "User {} with role {} is not allowed to predict",
                record.username, record.role
            );
            return Err(Error::forbidden(format!(
                "Role '{}' is not allowed to use the model",
                record.role
            )));
        }

        Ok(AuthenticatedUser {
            username: record.username,
            role: record.role,
        })
    }
}
