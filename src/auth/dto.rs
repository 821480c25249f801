use serde::{Deserialize, Serialize};

use super::claims::{Claims, Identity};

/// Request body for login.
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(rename = "Correo", default)]
    pub email: Option<String>,
    #[serde(rename = "Contrasena", default)]
    pub password: Option<String>,
}

/// Response returned after a successful login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: &'static str,
    pub token: String,
    #[serde(rename = "usuario")]
    pub user: Identity,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    #[serde(rename = "usuario")]
    pub user: Claims,
}
