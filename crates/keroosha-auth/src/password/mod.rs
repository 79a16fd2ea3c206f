//! Password encoding and credential policy.

pub mod hasher;
pub mod policy;

pub use hasher::{Argon2PasswordEncoder, PasswordEncoder};
pub use policy::CredentialPolicy;
