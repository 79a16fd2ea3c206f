//! Result aliases and the railway conversion utilities.
//!
//! Two result shapes exist in Keroosha:
//!
//! - [`AppResult<T>`] is what collaborators (repositories, token backends)
//!   return. Its error side carries full diagnostic detail.
//! - [`OpResult<T>`] is what business operations return. Its error side is
//!   a catalogued [`ErrorCode`] and nothing more.
//!
//! `catch`, `catch_async` and [`ResultExt::or_code`] move a value from the
//! first shape to the second, logging the discarded detail through the
//! caller's span.

use std::fmt;
use std::future::Future;

use tracing::Span;

use crate::error::AppError;
use crate::error_code::ErrorCode;

/// A specialized `Result` type for collaborator calls.
pub type AppResult<T> = Result<T, AppError>;

/// Railway result of a business operation.
pub type OpResult<T> = Result<T, ErrorCode>;

/// Runs `f`, replacing any error with `code` after logging it under `logger`.
pub fn catch<T, E, F>(code: ErrorCode, logger: &Span, f: F) -> OpResult<T>
where
    E: fmt::Display,
    F: FnOnce() -> Result<T, E>,
{
    f().or_code(code, logger)
}

/// Async form of [`catch`].
pub async fn catch_async<T, E, Fut>(code: ErrorCode, logger: &Span, fut: Fut) -> OpResult<T>
where
    E: fmt::Display,
    Fut: Future<Output = Result<T, E>>,
{
    fut.await.or_code(code, logger)
}

/// Method form of the railway conversion.
pub trait ResultExt<T> {
    /// Maps the error side to `code`, logging the original error.
    fn or_code(self, code: ErrorCode, logger: &Span) -> OpResult<T>;
}

impl<T, E: fmt::Display> ResultExt<T> for Result<T, E> {
    fn or_code(self, code: ErrorCode, logger: &Span) -> OpResult<T> {
        self.map_err(|e| {
            tracing::error!(parent: logger, error = %e, code = code.code(), "Operation failed");
            code
        })
    }
}
