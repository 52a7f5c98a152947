//! Password hashing, JWT issuance, and the request extractors that
//! gate authenticated and admin-only routes.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{config::AppConfig, errors::ServiceError, AppState};

/// JWT claims carried by an access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user id
    pub sub: String,
    pub username: String,
    pub admin: bool,
    pub iat: i64,
    pub exp: i64,
    pub iss: String,
}

/// Hashes a password with argon2id and a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, ServiceError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ServiceError::HashError(e.to_string()))
}

/// Verifies a password against a stored argon2 hash. A malformed
/// stored hash is an internal error, not a failed login.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, ServiceError> {
    let parsed = PasswordHash::new(stored_hash).map_err(|e| ServiceError::HashError(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Issues an HS256 access token for the given user.
pub fn issue_token(
    config: &AppConfig,
    user_id: Uuid,
    username: &str,
    is_admin: bool,
) -> Result<String, ServiceError> {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: user_id.to_string(),
        username: username.to_string(),
        admin: is_admin,
        iat: now,
        exp: now + config.jwt_expiration as i64,
        iss: config.auth_issuer.clone(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|e| ServiceError::InternalError(format!("Failed to sign token: {}", e)))
}

/// Decodes and validates an access token, checking signature, expiry,
/// and issuer.
pub fn decode_token(config: &AppConfig, token: &str) -> Result<Claims, ServiceError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[config.auth_issuer.as_str()]);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|_| ServiceError::Unauthorized("Invalid or expired token".to_string()))
}

/// Authenticated caller, extracted from the `Authorization: Bearer`
/// header. Rejects with 401 when the header is missing or the token
/// does not validate.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub username: String,
    pub is_admin: bool,
}

fn bearer_token(parts: &Parts) -> Result<&str, ServiceError> {
    parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| ServiceError::Unauthorized("Missing bearer token".to_string()))
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ServiceError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let token = bearer_token(parts)?;
        let claims = decode_token(&app_state.config, token)?;

        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| ServiceError::Unauthorized("Malformed token subject".to_string()))?;

        Ok(AuthUser {
            user_id,
            username: claims.username,
            is_admin: claims.admin,
        })
    }
}

/// Admin caller. Same extraction as [`AuthUser`], then a role check:
/// a valid token without the admin claim is a 403, not a 401.
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthUser);

#[async_trait]
impl<S> FromRequestParts<S> for AdminUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ServiceError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.is_admin {
            return Err(ServiceError::Forbidden(
                "Administrator access required".to_string(),
            ));
        }
        Ok(AdminUser(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> AppConfig {
        AppConfig::new(
            "sqlite://test.db?mode=rwc".into(),
            "this_is_a_development_secret_key_that_is_at_least_64_characters_long_for_testing"
                .into(),
            3600,
            "127.0.0.1".into(),
            8080,
            "development".into(),
        )
    }

    #[test]
    fn password_hash_round_trip() {
        let hash = hash_password("s3cret-password").unwrap();
        assert!(verify_password("s3cret-password", &hash).unwrap());
        assert!(!verify_password("wrong-password", &hash).unwrap());
    }

    #[test]
    fn hashes_are_salted() {
        let a = hash_password("same-input").unwrap();
        let b = hash_password("same-input").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn token_round_trip_preserves_claims() {
        let cfg = test_config();
        let user_id = Uuid::new_v4();
        let token = issue_token(&cfg, user_id, "moviegoer", false).unwrap();
        let claims = decode_token(&cfg, &token).unwrap();
        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.username, "moviegoer");
        assert!(!claims.admin);
        assert_eq!(claims.iss, cfg.auth_issuer);
    }

    #[test]
    fn tampered_token_is_rejected() {
        let cfg = test_config();
        let token = issue_token(&cfg, Uuid::new_v4(), "moviegoer", false).unwrap();
        let mut bad = token.clone();
        bad.truncate(token.len() - 2);
        assert!(decode_token(&cfg, &bad).is_err());
    }

    #[test]
    fn wrong_issuer_is_rejected() {
        let cfg = test_config();
        let mut other = test_config();
        other.auth_issuer = "someone-else".into();
        let token = issue_token(&other, Uuid::new_v4(), "moviegoer", true).unwrap();
        assert!(decode_token(&cfg, &token).is_err());
    }
}
