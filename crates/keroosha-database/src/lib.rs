//! # keroosha-database
//!
//! In-memory implementations of the user and role repository ports.
//! They back development setups, the CLI smoke run and the test suites.

pub mod repositories;

pub use repositories::role::MemoryRoleRepository;
pub use repositories::user::MemoryUserRepository;
