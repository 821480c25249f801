use thiserror::Error;

/// Outcomes of the credential subsystem other than success.
///
/// Everything except `HashFailure` and `Signing` is an expected result of bad
/// input and is handed back to the caller as a value.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("password hashing failed: {0}")]
    HashFailure(String),
    #[error("credentials do not match")]
    VerificationMismatch,
    #[error("token is malformed")]
    MalformedToken,
    #[error("token signature does not verify")]
    BadSignature,
    #[error("token has expired")]
    Expired,
    #[error("token could not be signed: {0}")]
    Signing(String),
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => AuthError::BadSignature,
            ErrorKind::ExpiredSignature => AuthError::Expired,
            _ => AuthError::MalformedToken,
        }
    }
}
