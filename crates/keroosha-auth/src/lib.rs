//! # keroosha-auth
//!
//! Storage-agnostic authentication and authorization engine.
//!
//! ## Modules
//!
//! - `password`: Argon2id password encoding and credential policy
//! - `jwt`: signed, self-contained token backend
//! - `token`: in-memory token backend and backend selection
//! - `manager`: generic `AuthManager` and the user-specific `UserAuthManager`
//! - `throttle`: per-user confirmation request throttle
//! - `confirmation`: confirmation code issuance and account activation
//! - `gate`: request-time authentication and any-of role checks

pub mod confirmation;
pub mod gate;
pub mod jwt;
pub mod manager;
pub mod password;
pub mod throttle;
pub mod token;

pub use confirmation::{CodeDelivery, ConfirmationCodeKind, ConfirmationService, LogCodeDelivery};
pub use gate::{GateRejection, GateSession, SessionGate, TokenCarrier};
pub use jwt::JwtTokenStorage;
pub use manager::{AuthManager, Authenticated, UserAuthManager};
pub use password::{Argon2PasswordEncoder, CredentialPolicy, PasswordEncoder};
pub use throttle::ConfirmationThrottle;
pub use token::{MemoryTokenStorage, build_token_storage, spawn_token_purger};
