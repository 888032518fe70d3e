// Password hashing and identity tokens
// Argon2 PHC strings for stored passwords, HS256 JWTs for request identity

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

use crate::config::AuthConfig;
use crate::core::EntityId;
use crate::error::{AppError, AppResult};
use crate::infrastructure::viewer::Identity;

/// JWT claims carried by an identity token
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user id
    pub email: String,
    pub iat: u64,
    pub exp: u64,
    pub iss: String,
}

#[derive(Debug, Clone)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub jwt_expiry: Duration,
    pub issuer: String,
}

impl From<&AuthConfig> for SecurityConfig {
    fn from(config: &AuthConfig) -> Self {
        Self {
            jwt_secret: config.jwt_secret.clone(),
            jwt_expiry: Duration::from_secs(config.jwt_expiry_secs),
            issuer: config.jwt_issuer.clone(),
        }
    }
}

/// Token issuance/verification and password hashing
pub struct SecurityService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    config: SecurityConfig,
}

impl SecurityService {
    pub fn new(config: SecurityConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

        Self {
            encoding_key,
            decoding_key,
            config,
        }
    }

    /// Sign an identity token for `user_id`
    #[instrument(skip(self))]
    pub fn issue_token(&self, user_id: EntityId, email: &str) -> AppResult<String> {
        let now = unix_now();
        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            iat: now,
            exp: now + self.config.jwt_expiry.as_secs(),
            iss: self.config.issuer.clone(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    /// Verify signature, expiry and issuer, and return the embedded identity
    #[instrument(skip(self, token))]
    pub fn verify_token(&self, token: &str) -> AppResult<Identity> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[self.config.issuer.as_str()]);
        validation.leeway = 0;

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| {
                warn!("Rejected identity token: {}", e);
                AppError::NotAuthenticated
            })?
            .claims;

        let user_id = claims.sub.parse::<EntityId>().map_err(|_| {
            warn!("Identity token subject is not an id: {}", claims.sub);
            AppError::NotAuthenticated
        })?;

        Ok(Identity {
            user_id,
            email: claims.email,
        })
    }

    /// Hash password using Argon2 on the blocking pool
    pub async fn hash_password(&self, password: &str) -> AppResult<String> {
        let password = password.to_owned();
        tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|e| AppError::Internal(format!("Password hashing task failed: {}", e)))?
    }

    /// Verify password against a stored hash on the blocking pool
    pub async fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool> {
        let password = password.to_owned();
        let hash = hash.to_owned();
        tokio::task::spawn_blocking(move || verify_password(&password, &hash))
            .await
            .map_err(|e| AppError::Internal(format!("Password verification task failed: {}", e)))?
    }
}

fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;

    Ok(password_hash.to_string())
}

fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AppError::Internal(format!("Invalid password hash: {}", e)))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}
