use super::handlers::AppState;
use crate::{Error, auth::AuthenticatedUser};
use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};

const NOT_AUTHENTICATED: &str = "Not authenticated";

/// Caller resolved from the `Authorization: Bearer <token>` header.
pub struct Authenticated(pub AuthenticatedUser);

#[async_trait]
impl<S> FromRequestParts<S> for Authenticated
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or_else(|| Error::unauthorized(NOT_AUTHENTICATED))?;

        let state = AppState::from_ref(state);
        let user = state.auth.authorize(token).await?;

        Ok(Self(user))
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = token.trim();
    (!token.is_empty()).then_some(token)
}
