//! Authentication: one static admin account and a JWT session.
//!
//! The password is never stored in plain text, not even in config. The config carries an
//! Argon2id hash and the login handler verifies against it.

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand_core::OsRng;
use serde::{Deserialize, Serialize};
use snapsync_common::config::AuthConfig;

/// Name of the HttpOnly cookie carrying the session token.
pub const SESSION_COOKIE: &str = "snapsync_session";

/// JWT claims embedded in session tokens.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (admin username)
    pub sub: String,
    /// Issued at
    pub iat: i64,
    /// Expiration
    pub exp: i64,
}

/// Token returned on login.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionToken {
    pub token: String,
    pub token_type: String,
    pub expires_in: u64,
}

/// Hash a password using Argon2id.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2.hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a password against an Argon2id hash.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed_hash = PasswordHash::new(hash)?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Check a login attempt against the configured admin account.
///
/// The password hash is checked even when the username is wrong, so both failures cost the same.
pub fn check_credentials(config: &AuthConfig, username: &str, password: &str) -> bool {
    if config.admin_password_hash.is_empty() {
        return false;
    }
    let password_ok = match verify_password(password, &config.admin_password_hash) {
        Ok(ok) => ok,
        Err(e) => {
            tracing::error!("Configured admin password hash is invalid: {e}");
            false
        }
    };
    password_ok && username == config.admin_username
}

/// Issue a session token for `username`.
pub fn issue_session_token(
    username: &str,
    secret: &str,
    ttl_secs: u64,
) -> Result<SessionToken, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let claims = Claims {
        sub: username.to_string(),
        iat: now.timestamp(),
        exp: now
            .timestamp()
            .saturating_add(i64::try_from(ttl_secs).unwrap_or(i64::MAX)),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(SessionToken {
        token,
        token_type: "Bearer".to_string(),
        expires_in: ttl_secs,
    })
}

/// Validate and decode a session token.
pub fn validate_session_token(
    token: &str,
    secret: &str,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(token_data.claims)
}

impl Claims {
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}
