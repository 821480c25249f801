use async_trait::async_trait;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use tracing::warn;

use super::{claims::Claims, error::AuthError, jwt::JwtKeys};
use crate::error::ApiError;

/// Pulls a bearer token out of the `Authorization` header and verifies it.
pub struct AuthUser(pub Claims);

/// `Ok(None)` when no token was presented at all.
pub(crate) fn bearer_token(parts: &Parts) -> Result<Option<&str>, AuthError> {
    let Some(value) = parts.headers.get(AUTHORIZATION) else {
        return Ok(None);
    };
    let value = value.to_str().map_err(|_| AuthError::MalformedToken)?.trim();
    let mut pieces = value.splitn(2, ' ');
    let scheme = pieces.next().unwrap_or_default();
    let token = pieces.next().map(str::trim).unwrap_or_default();

    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::MalformedToken);
    }
    if token.is_empty() {
        return Ok(None);
    }
    Ok(Some(token))
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = match bearer_token(parts) {
            Ok(Some(token)) => token,
            Ok(None) => {
                warn!("request without bearer token");
                return Err(ApiError::MissingToken);
            }
            Err(kind) => {
                warn!(reason = %kind, "unusable Authorization header");
                return Err(ApiError::InvalidToken(kind));
            }
        };

        let keys = JwtKeys::from_ref(state);
        match keys.verify(token) {
            Ok(claims) => Ok(AuthUser(claims)),
            Err(kind) => {
                warn!(reason = %kind, "token rejected");
                Err(ApiError::InvalidToken(kind))
            }
        }
    }
}
