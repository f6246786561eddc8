use axum::{
    extract::State,
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use skylark_core::user::{self, NewUser};

use crate::error::ApiError;
use crate::middleware::auth::{decode_token, issue_token, ACCESS_TOKEN, REFRESH_TOKEN};
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenPairResponse {
    pub access: String,
    pub refresh: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh: String,
}

#[derive(Debug, Serialize)]
pub struct AccessTokenResponse {
    pub access: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/login/refresh", post(refresh))
        .route("/register", post(register))
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /login
async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<TokenPairResponse>, ApiError> {
    let user = state
        .users
        .find_by_username(&req.username)
        .await
        .map_err(|e| ApiError::InternalServerError(e.to_string()))?
        .ok_or_else(|| ApiError::AuthenticationError("invalid username or password".to_string()))?;

    if !user::verify_password(&req.password, &user.password_hash) {
        return Err(ApiError::AuthenticationError(
            "invalid username or password".to_string(),
        ));
    }

    let access = issue_token(&state.auth, user.id, &user.username, ACCESS_TOKEN)
        .map_err(|e| ApiError::InternalServerError(format!("Token encoding failed: {}", e)))?;
    let refresh = issue_token(&state.auth, user.id, &user.username, REFRESH_TOKEN)
        .map_err(|e| ApiError::InternalServerError(format!("Token encoding failed: {}", e)))?;

    Ok(Json(TokenPairResponse { access, refresh }))
}

/// POST /login/refresh
async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> Result<Json<AccessTokenResponse>, ApiError> {
    let claims = decode_token(&state.auth, &req.refresh)
        .map_err(|_| ApiError::AuthenticationError("invalid refresh token".to_string()))?;

    if claims.token_use != REFRESH_TOKEN {
        return Err(ApiError::AuthenticationError(
            "invalid refresh token".to_string(),
        ));
    }

    let user_id: i64 = claims
        .sub
        .parse()
        .map_err(|_| ApiError::AuthenticationError("invalid refresh token".to_string()))?;

    let access = issue_token(&state.auth, user_id, &claims.username, ACCESS_TOKEN)
        .map_err(|e| ApiError::InternalServerError(format!("Token encoding failed: {}", e)))?;

    Ok(Json(AccessTokenResponse { access }))
}

/// POST /register
async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    if req.username.trim().is_empty() || req.password.is_empty() {
        return Err(ApiError::ValidationError(
            "username and password are required".to_string(),
        ));
    }

    let taken = state
        .users
        .find_by_username(&req.username)
        .await
        .map_err(|e| ApiError::InternalServerError(e.to_string()))?
        .is_some();
    if taken {
        return Err(ApiError::ConflictError(format!(
            "username {} is taken",
            req.username
        )));
    }

    let password_hash = user::hash_password(&req.password)
        .map_err(|e| ApiError::InternalServerError(e.to_string()))?;

    let created = state
        .users
        .insert(NewUser {
            username: req.username,
            password_hash,
        })
        .await
        .map_err(|e| ApiError::InternalServerError(e.to_string()))?;

    Ok((
        StatusCode::CREATED,
        Json(UserResponse {
            id: created.id,
            username: created.username,
        }),
    ))
}
