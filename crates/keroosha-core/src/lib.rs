//! # keroosha-core
//!
//! Core crate for the Keroosha identity engine. Contains the business
//! error catalogue, the railway result type, configuration schemas,
//! identity and collaborator traits, and the infrastructure error type.
//!
//! This crate has **no** internal dependencies on other Keroosha crates.

pub mod config;
pub mod error;
pub mod error_code;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use error_code::ErrorCode;
pub use result::{AppResult, OpResult};
pub use types::id::UserId;
