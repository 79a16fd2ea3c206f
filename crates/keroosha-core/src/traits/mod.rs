//! Core traits defined in `keroosha-core` and implemented by other crates.

pub mod clock;
pub mod identity;
pub mod repository;
pub mod token_storage;

pub use clock::{Clock, ManualClock, SystemClock};
pub use identity::{HasId, HasPasswordAuth};
pub use repository::PasswordAuthRepository;
pub use token_storage::{LoadedToken, TokenStorage, TokenStorageExt};
