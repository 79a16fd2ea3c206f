//! JWT token validation.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use tracing::debug;

use keroosha_core::config::TokenConfig;

use super::claims::Claims;

/// Validates signed tokens.
#[derive(Clone)]
pub struct JwtDecoder {
    /// HMAC secret key for verification.
    decoding_key: DecodingKey,
    /// Validation configuration.
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a new decoder from token configuration.
    pub fn new(config: &TokenConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 5; // 5 seconds leeway for clock skew
        validation.set_issuer(&[config.issuer.as_str()]);

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    /// Decodes and validates a token string.
    ///
    /// Checks signature, expiration and issuer. Any failure yields `None`.
    pub fn decode(&self, token: &str) -> Option<Claims> {
        match decode::<Claims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => Some(data.claims),
            Err(e) => {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                        debug!("Rejected expired token")
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                        debug!("Rejected token with invalid signature")
                    }
                    _ => debug!(error = %e, "Rejected malformed token"),
                }
                None
            }
        }
    }
}
