use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::state::{AppState, AuthConfig};

pub const ACCESS_TOKEN: &str = "access";
pub const REFRESH_TOKEN: &str = "refresh";

// ============================================================================
// JWT Claims
// ============================================================================

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub username: String,
    pub token_use: String,
    pub jti: String,
    pub exp: usize,
}

/// Caller identity resolved from a validated access token, injected into
/// request extensions by `require_auth`.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: i64,
    pub username: String,
}

// ============================================================================
// Token issue / validate
// ============================================================================

pub fn issue_token(
    auth: &AuthConfig,
    user_id: i64,
    username: &str,
    token_use: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    let ttl = match token_use {
        REFRESH_TOKEN => auth.refresh_ttl,
        _ => auth.access_ttl,
    };
    let claims = Claims {
        sub: user_id.to_string(),
        username: username.to_owned(),
        token_use: token_use.to_owned(),
        jti: Uuid::new_v4().to_string(),
        exp: (Utc::now() + Duration::seconds(ttl as i64)).timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(auth.secret.as_bytes()),
    )
}

pub fn decode_token(
    auth: &AuthConfig,
    token: &str,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(auth.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
}

// ============================================================================
// Bearer Authentication Middleware
// ============================================================================

pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    // 1. Extract token from Authorization header
    let auth_header = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(StatusCode::UNAUTHORIZED)?;

    // 2. Decode and validate JWT
    let claims = decode_token(&state.auth, token).map_err(|_| StatusCode::UNAUTHORIZED)?;

    // 3. A refresh token is not a login
    if claims.token_use != ACCESS_TOKEN {
        return Err(StatusCode::UNAUTHORIZED);
    }

    let user_id = claims
        .sub
        .parse::<i64>()
        .map_err(|_| StatusCode::UNAUTHORIZED)?;

    // 4. Inject the resolved identity into request extensions
    req.extensions_mut().insert(AuthUser {
        id: user_id,
        username: claims.username,
    });

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_auth() -> AuthConfig {
        AuthConfig {
            secret: "test-secret".to_string(),
            access_ttl: 300,
            refresh_ttl: 86400,
        }
    }

    #[test]
    fn issue_then_decode_round_trip() {
        let auth = test_auth();
        let token = issue_token(&auth, 7, "laila", ACCESS_TOKEN).unwrap();
        let claims = decode_token(&auth, &token).unwrap();

        assert_eq!(claims.sub, "7");
        assert_eq!(claims.username, "laila");
        assert_eq!(claims.token_use, ACCESS_TOKEN);
    }

    #[test]
    fn refresh_tokens_are_marked_as_such() {
        let auth = test_auth();
        let token = issue_token(&auth, 7, "laila", REFRESH_TOKEN).unwrap();
        let claims = decode_token(&auth, &token).unwrap();

        assert_eq!(claims.token_use, REFRESH_TOKEN);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let auth = test_auth();
        let token = issue_token(&auth, 7, "laila", ACCESS_TOKEN).unwrap();

        let other = AuthConfig {
            secret: "other-secret".to_string(),
            ..test_auth()
        };
        assert!(decode_token(&other, &token).is_err());
    }

    #[test]
    fn expired_tokens_are_rejected() {
        let auth = test_auth();
        let claims = Claims {
            sub: "7".to_string(),
            username: "laila".to_string(),
            token_use: ACCESS_TOKEN.to_string(),
            jti: Uuid::new_v4().to_string(),
            // Well past any validation leeway.
            exp: (Utc::now() - Duration::hours(2)).timestamp() as usize,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(auth.secret.as_bytes()),
        )
        .unwrap();

        assert!(decode_token(&auth, &token).is_err());
    }

    #[test]
    fn garbage_tokens_are_rejected() {
        let auth = test_auth();
        assert!(decode_token(&auth, "not.a.jwt").is_err());
    }
}
