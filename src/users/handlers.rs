use axum::{
    extract::State,
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use tracing::{info, instrument, warn};

use super::{
    dto::{non_empty, MessageResponse, UserRequest, UserResponse},
    repo_types::{NewUser, UserChanges},
};
use crate::{
    auth::password::hash_password_async,
    error::ApiError,
    extract::{JsonBody, UserId},
    state::AppState,
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/usuarios", get(list_users))
        .route("/usuarios/:id", get(get_user))
        .route("/crearusuario", post(create_user))
        .route("/actualizarusuario/:id", put(update_user))
        .route("/eliminarusuario/:id", delete(delete_user))
}

#[instrument(skip(state))]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let users = state.users.list().await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    UserId(id): UserId,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state.users.find_by_id(id).await?.ok_or(ApiError::NotFound)?;
    Ok(Json(user.into()))
}

#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<UserRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let (Some(name), Some(email), Some(password)) = (
        non_empty(payload.name),
        non_empty(payload.email),
        non_empty(payload.password),
    ) else {
        return Err(ApiError::BadRequest("Faltan campos requeridos"));
    };

    let password_hash = hash_password_async(password, state.config.hash_cost).await?;
    let user = state
        .users
        .create(NewUser {
            name,
            email,
            password_hash,
        })
        .await
        .map_err(|e| {
            warn!(error = %e, "create user failed");
            ApiError::from(e)
        })?;

    info!(user_id = user.id, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "Usuario creado",
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    UserId(id): UserId,
    JsonBody(payload): JsonBody<UserRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let name = non_empty(payload.name);
    let email = non_empty(payload.email);
    let password = non_empty(payload.password);

    if name.is_none() && email.is_none() && password.is_none() {
        return Err(ApiError::BadRequest("No hay campos para actualizar"));
    }

    let password_hash = match password {
        Some(p) => Some(hash_password_async(p, state.config.hash_cost).await?),
        None => None,
    };
    let changes = UserChanges {
        name,
        email,
        password_hash,
    };

    if !state.users.update(id, changes).await? {
        warn!(user_id = id, "update of unknown user");
        return Err(ApiError::NotFound);
    }

    info!(user_id = id, "user updated");
    Ok(Json(MessageResponse {
        message: "Usuario actualizado",
    }))
}

#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    UserId(id): UserId,
) -> Result<Json<MessageResponse>, ApiError> {
    if !state.users.delete(id).await? {
        return Err(ApiError::NotFound);
    }

    info!(user_id = id, "user deleted");
    Ok(Json(MessageResponse {
        message: "Usuario eliminado",
    }))
}
