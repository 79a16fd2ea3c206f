//! [`TokenStorage`] backed by signed JWTs.

use async_trait::async_trait;
use serde_json::Value;
use tracing::warn;

use keroosha_core::config::TokenConfig;
use keroosha_core::result::AppResult;
use keroosha_core::traits::{LoadedToken, TokenStorage};

use super::decoder::JwtDecoder;
use super::encoder::JwtEncoder;

/// Stateless token backend: the payload travels inside the token.
///
/// Every successful load re-signs the payload, so the renew token carries
/// a new expiry and differs from the presented one.
#[derive(Debug, Clone)]
pub struct JwtTokenStorage {
    encoder: JwtEncoder,
    decoder: JwtDecoder,
}

impl JwtTokenStorage {
    /// Creates the backend from token configuration.
    pub fn new(config: &TokenConfig) -> Self {
        Self {
            encoder: JwtEncoder::new(config),
            decoder: JwtDecoder::new(config),
        }
    }
}

#[async_trait]
impl TokenStorage for JwtTokenStorage {
    async fn create_raw(&self, payload: Value) -> AppResult<String> {
        self.encoder.encode(payload)
    }

    async fn load_raw(&self, token: &str) -> Option<LoadedToken<Value>> {
        let claims = self.decoder.decode(token)?;
        let renew_token = match self.encoder.encode(claims.dat.clone()) {
            Ok(t) => t,
            Err(e) => {
                warn!(error = %e, "Failed to re-sign token, keeping presented one");
                token.to_string()
            }
        };

        Some(LoadedToken {
            data: claims.dat,
            renew_token,
        })
    }
}
