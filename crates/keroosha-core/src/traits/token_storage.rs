//! Token storage contract.
//!
//! A backend turns an arbitrary serializable payload into an opaque string
//! and back. How the string is built (signed claims, a table key, ...) is
//! entirely the backend's concern.

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::result::AppResult;

/// A payload recovered from a token, with the token callers should use next.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedToken<T> {
    /// The decoded payload.
    pub data: T,
    /// Canonical token going forward. Equal to the presented token for
    /// backends that do not rotate.
    pub renew_token: String,
}

/// Object-safe storage backend working on JSON payloads.
#[async_trait]
pub trait TokenStorage: Send + Sync + std::fmt::Debug + 'static {
    /// Mints a token for the payload.
    async fn create_raw(&self, payload: Value) -> AppResult<String>;

    /// Resolves a token. Malformed, expired, unknown or foreign tokens
    /// yield `None`; this never fails.
    async fn load_raw(&self, token: &str) -> Option<LoadedToken<Value>>;

    /// Drops expired tokens the backend holds, returning how many went.
    /// Self-contained tokens hold nothing server-side.
    fn purge_expired(&self) -> usize {
        0
    }
}

/// Typed helpers over any [`TokenStorage`].
#[async_trait]
pub trait TokenStorageExt: TokenStorage {
    /// Serializes `payload` and mints a token for it.
    async fn create_token<T>(&self, payload: &T) -> AppResult<String>
    where
        T: Serialize + Sync,
    {
        let value = serde_json::to_value(payload)?;
        self.create_raw(value).await
    }

    /// Loads a token and deserializes its payload as `T`.
    ///
    /// A payload that does not match `T` is treated like an invalid token.
    async fn load_token<T>(&self, token: &str) -> Option<LoadedToken<T>>
    where
        T: DeserializeOwned + Send,
    {
        let loaded = self.load_raw(token).await?;
        match serde_json::from_value(loaded.data) {
            Ok(data) => Some(LoadedToken {
                data,
                renew_token: loaded.renew_token,
            }),
            Err(e) => {
                tracing::debug!(error = %e, "Token payload has unexpected shape");
                None
            }
        }
    }
}

impl<S: TokenStorage + ?Sized> TokenStorageExt for S {}
