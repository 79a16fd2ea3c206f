//! JWT claims structure wrapping an arbitrary payload.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims embedded in every signed token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// The caller's payload.
    pub dat: serde_json::Value,
    /// Issuer.
    pub iss: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
    /// Unique token id; differs between a token and its renewal.
    pub jti: Uuid,
}
