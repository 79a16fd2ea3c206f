//! JWT token creation with configurable signing and TTL.

use chrono::Utc;
use jsonwebtoken::{EncodingKey, Header, encode};
use uuid::Uuid;

use keroosha_core::AppError;
use keroosha_core::config::TokenConfig;
use keroosha_core::result::AppResult;

use super::claims::Claims;

/// Creates signed tokens.
#[derive(Clone)]
pub struct JwtEncoder {
    /// HMAC secret key for signing.
    encoding_key: EncodingKey,
    /// Issuer written into every token.
    issuer: String,
    /// Token lifetime.
    ttl: chrono::Duration,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("issuer", &self.issuer)
            .field("ttl_minutes", &self.ttl.num_minutes())
            .finish()
    }
}

impl JwtEncoder {
    /// Creates a new encoder from token configuration.
    pub fn new(config: &TokenConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            issuer: config.issuer.clone(),
            ttl: config.ttl(),
        }
    }

    /// Signs `payload` with a fresh issue time, expiry and token id.
    pub fn encode(&self, payload: serde_json::Value) -> AppResult<String> {
        let now = Utc::now();
        let exp = now + self.ttl;

        let claims = Claims {
            dat: payload,
            iss: self.issuer.clone(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            jti: Uuid::new_v4(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::crypto(format!("Failed to encode token: {e}")))
    }
}
