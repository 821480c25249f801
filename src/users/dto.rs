use serde::{Deserialize, Serialize};

use super::repo_types::User;

/// Absent and empty fields both count as "not provided".
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Request body for registration and profile update.
#[derive(Debug, Default, Deserialize)]
pub struct UserRequest {
    #[serde(rename = "Nombre", default)]
    pub name: Option<String>,
    #[serde(rename = "Correo", default)]
    pub email: Option<String>,
    #[serde(rename = "Contrasena", default)]
    pub password: Option<String>,
}

/// Public view of a user; the hash is never part of it.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    #[serde(rename = "IdUsuario")]
    pub id: i32,
    #[serde(rename = "Nombre")]
    pub name: String,
    #[serde(rename = "Correo")]
    pub email: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}
