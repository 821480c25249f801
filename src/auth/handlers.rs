use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        claims::Identity,
        dto::{LoginRequest, LoginResponse, ProfileResponse},
        error::AuthError,
        extractors::AuthUser,
        password::verify_password_async,
    },
    error::ApiError,
    extract::JsonBody,
    state::AppState,
    users::dto::non_empty,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new().route("/login", post(login))
}

pub fn profile_routes() -> Router<AppState> {
    Router::new().route("/perfil", get(profile))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let (Some(email), Some(password)) = (non_empty(payload.email), non_empty(payload.password))
    else {
        return Err(ApiError::BadRequest("Correo y contraseña son requeridos"));
    };

    let Some(user) = state.users.find_by_email(&email).await? else {
        // Same bcrypt cost as a real check, so timing does not reveal unknown emails.
        verify_password_async(password, state.decoy_hash.to_string()).await?;
        warn!(email = %email, "login unknown email");
        return Err(ApiError::InvalidCredentials);
    };

    if !verify_password_async(password, user.password_hash).await? {
        warn!(user_id = user.id, "login invalid password");
        return Err(AuthError::VerificationMismatch.into());
    }

    let identity = Identity {
        id: user.id,
        name: user.name,
        email: user.email,
    };
    let token = state.keys.issue(&identity)?;

    info!(user_id = identity.id, "user logged in");
    Ok(Json(LoginResponse {
        message: "Login exitoso",
        token,
        user: identity,
    }))
}

#[instrument(skip_all)]
pub async fn profile(AuthUser(claims): AuthUser) -> Json<ProfileResponse> {
    Json(ProfileResponse { user: claims })
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        Router,
    };
    use serde_json::{json, Value};
    use time::{Duration, OffsetDateTime};
    use tower::ServiceExt;

    use super::*;
    use crate::auth::{jwt::JwtKeys, password::hash_password};
    use crate::users::repo_types::NewUser;

    async fn seeded_state() -> AppState {
        let state = AppState::fake();
        let hash = hash_password("correctpass", state.config.hash_cost).unwrap();
        state
            .users
            .create(NewUser {
                name: "Juan".into(),
                email: "juan@test.com".into(),
                password_hash: hash,
            })
            .await
            .unwrap();
        state
    }

    fn app(state: AppState) -> Router {
        Router::new()
            .merge(auth_routes())
            .merge(profile_routes())
            .with_state(state)
    }

    async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
        let res = app.oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    fn login_request(body: Value) -> Request<Body> {
        Request::post("/login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn profile_request(auth: Option<&str>) -> Request<Body> {
        let mut builder = Request::get("/perfil");
        if let Some(value) = auth {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn login_requires_both_fields() {
        let (status, body) = send(
            app(AppState::fake()),
            login_request(json!({ "Correo": "test@example.com" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Correo y contraseña son requeridos" }));
    }

    #[tokio::test]
    async fn login_treats_empty_strings_as_missing() {
        let (status, _) = send(
            app(AppState::fake()),
            login_request(json!({ "Correo": "", "Contrasena": "x" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn login_unknown_email_is_unauthorized() {
        let (status, body) = send(
            app(AppState::fake()),
            login_request(json!({ "Correo": "noexiste@example.com", "Contrasena": "password123" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({ "error": "Credenciales inválidas" }));
    }

    #[tokio::test]
    async fn unknown_email_and_wrong_password_look_the_same() {
        let state = seeded_state().await;
        let unknown = send(
            app(state.clone()),
            login_request(json!({ "Correo": "noexiste@test.com", "Contrasena": "correctpass" })),
        )
        .await;
        let wrong = send(
            app(state),
            login_request(json!({ "Correo": "juan@test.com", "Contrasena": "wrongpass" })),
        )
        .await;
        assert_eq!(unknown, wrong);
    }

    #[test]
    fn decoy_hash_is_bcrypt_at_configured_cost() {
        let state = AppState::fake();
        let prefix = format!("$2b${:02}$", state.config.hash_cost);
        assert!(state.decoy_hash.starts_with(&prefix));
        assert!(!crate::auth::password::verify_password("correctpass", &state.decoy_hash));
    }

    #[tokio::test]
    async fn login_with_malformed_body_is_json_bad_request() {
        let req = Request::post("/login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("not json"))
            .unwrap();
        let (status, body) = send(app(AppState::fake()), req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Cuerpo de la solicitud inválido" }));
    }

    #[tokio::test]
    async fn login_wrong_password_is_unauthorized() {
        let (status, body) = send(
            app(seeded_state().await),
            login_request(json!({ "Correo": "juan@test.com", "Contrasena": "wrongpass" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({ "error": "Credenciales inválidas" }));
    }

    #[tokio::test]
    async fn login_email_match_is_case_sensitive() {
        let (status, _) = send(
            app(seeded_state().await),
            login_request(json!({ "Correo": "JUAN@test.com", "Contrasena": "correctpass" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn login_returns_token_and_identity() {
        let state = seeded_state().await;
        let keys = state.keys.clone();
        let (status, body) = send(
            app(state),
            login_request(json!({ "Correo": "juan@test.com", "Contrasena": "correctpass" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Login exitoso");
        assert_eq!(body["usuario"], json!({ "id": 1, "nombre": "Juan", "correo": "juan@test.com" }));
        assert!(body.get("ContrasenaHash").is_none());

        let claims = keys.verify(body["token"].as_str().unwrap()).unwrap();
        assert_eq!(claims.id, 1);
        assert_eq!(claims.email, "juan@test.com");
    }

    #[tokio::test]
    async fn profile_without_token_is_forbidden() {
        let (status, body) = send(app(AppState::fake()), profile_request(None)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body, json!({ "error": "Token no proporcionado" }));
    }

    #[tokio::test]
    async fn profile_with_invalid_token_is_unauthorized() {
        let (status, body) = send(
            app(AppState::fake()),
            profile_request(Some("Bearer token_invalido")),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({ "error": "Token inválido" }));
    }

    #[tokio::test]
    async fn profile_rejects_expired_and_foreign_tokens() {
        let state = AppState::fake();
        let identity = Identity {
            id: 7,
            name: "Ana".into(),
            email: "ana@test.com".into(),
        };
        let expired = state
            .keys
            .issue_at(&identity, Duration::hours(1), OffsetDateTime::now_utc() - Duration::hours(2))
            .unwrap();
        let foreign = JwtKeys::new(b"someone-else", Duration::hours(1))
            .issue(&identity)
            .unwrap();

        for token in [expired, foreign] {
            let auth = format!("Bearer {token}");
            let (status, _) = send(app(state.clone()), profile_request(Some(&auth))).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED);
        }
    }

    #[tokio::test]
    async fn login_then_profile_roundtrip() {
        let state = seeded_state().await;
        let (_, body) = send(
            app(state.clone()),
            login_request(json!({ "Correo": "juan@test.com", "Contrasena": "correctpass" })),
        )
        .await;
        let auth = format!("Bearer {}", body["token"].as_str().unwrap());

        let (status, body) = send(app(state), profile_request(Some(&auth))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["usuario"]["id"], 1);
        assert_eq!(body["usuario"]["nombre"], "Juan");
        assert_eq!(body["usuario"]["correo"], "juan@test.com");
        assert!(body["usuario"]["exp"].as_u64().is_some());
    }
}
