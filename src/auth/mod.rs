//! JWT issuance and the /api/authenticate endpoint.

use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::audit;
use crate::config;
use crate::domain::User;
use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    /// Comma-separated authority names.
    pub auth: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(login: String, authorities: &[String], remember_me: bool) -> Self {
        let now = Utc::now();
        let security = &config::config().security;
        let expiry_hours = if remember_me {
            security.jwt_remember_me_expiry_hours
        } else {
            security.jwt_expiry_hours
        };
        let exp = (now + Duration::hours(expiry_hours as i64)).timestamp();

        Self {
            sub: login,
            auth: authorities.join(","),
            exp,
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    #[error("JWT secret is not configured")]
    InvalidSecret,
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        tracing::error!("auth error: {}", err);
        ApiError::internal_server_error("An error occurred while processing your request")
    }
}

pub fn generate_jwt(claims: &Claims) -> Result<String, AuthError> {
    let secret = &config::config().security.jwt_secret;
    if secret.is_empty() {
        return Err(AuthError::InvalidSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::default(), claims, &encoding_key)
        .map_err(|e| AuthError::TokenGeneration(e.to_string()))
}

/// SHA-256 hex digest used for stored credentials.
pub fn hash_password(raw: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub remember_me: bool,
}

/// POST /api/authenticate : validate credentials and issue a JWT.
///
/// The token is returned both in the body (`id_token`) and as an
/// Authorization header. Outcomes are recorded in the audit log.
pub async fn authenticate(
    State(state): State<AppState>,
    Json(login): Json<LoginRequest>,
) -> Result<Response, ApiError> {
    tracing::debug!("REST request to authenticate {}", login.username);

    let user: Option<User> = sqlx::query_as("SELECT * FROM hr_user WHERE login = ?")
        .bind(&login.username)
        .fetch_optional(&state.pool)
        .await?;

    let valid = user
        .as_ref()
        .map(|u| u.activated && u.password_hash == hash_password(&login.password))
        .unwrap_or(false);

    if !valid {
        record_audit(
            &state,
            &login.username,
            audit::AUTHENTICATION_FAILURE,
            Some(json!({ "message": "Bad credentials" })),
        )
        .await;
        return Err(ApiError::unauthorized("Bad credentials"));
    }

    let authorities: Vec<String> =
        sqlx::query_scalar("SELECT authority_name FROM user_authority WHERE user_id = ?")
            .bind(user.as_ref().map(|u| u.id))
            .fetch_all(&state.pool)
            .await?;

    let claims = Claims::new(login.username.clone(), &authorities, login.remember_me);
    let token = generate_jwt(&claims)?;

    record_audit(&state, &login.username, audit::AUTHENTICATION_SUCCESS, None).await;

    let mut headers = HeaderMap::new();
    if let Ok(v) = HeaderValue::from_str(&format!("Bearer {}", token)) {
        headers.insert(header::AUTHORIZATION, v);
    }
    Ok((StatusCode::OK, headers, Json(json!({ "id_token": token }))).into_response())
}

/// Audit persistence must never break the authentication flow.
async fn record_audit(
    state: &AppState,
    principal: &str,
    event_type: &str,
    data: Option<serde_json::Value>,
) {
    if let Err(e) = audit::record(&state.pool, principal, event_type, data).await {
        tracing::warn!("failed to record audit event: {}", e);
    }
}
