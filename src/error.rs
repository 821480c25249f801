use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::auth::error::AuthError;
use crate::users::repo_types::StoreError;

/// Errors as the HTTP layer reports them. Every variant renders `{"error": ...}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(&'static str),
    #[error("Credenciales inválidas")]
    InvalidCredentials,
    #[error("Token inválido")]
    InvalidToken(#[source] AuthError),
    #[error("Token no proporcionado")]
    MissingToken,
    #[error("Usuario no encontrado")]
    NotFound,
    #[error("{0}")]
    Conflict(&'static str),
    #[error("Error interno del servidor")]
    Internal(#[source] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidCredentials | ApiError::InvalidToken(_) => StatusCode::UNAUTHORIZED,
            ApiError::MissingToken => StatusCode::FORBIDDEN,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateEmail => ApiError::Conflict("El correo ya está registrado"),
            StoreError::Database(e) => ApiError::Internal(e.into()),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::VerificationMismatch => ApiError::InvalidCredentials,
            AuthError::MalformedToken | AuthError::BadSignature | AuthError::Expired => {
                ApiError::InvalidToken(err)
            }
            AuthError::HashFailure(_) | AuthError::Signing(_) => ApiError::Internal(err.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let ApiError::Internal(e) = &self {
            error!(error = ?e, "request failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
