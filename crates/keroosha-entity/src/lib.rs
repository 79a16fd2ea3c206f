//! # keroosha-entity
//!
//! Domain entity models for the Keroosha identity engine, and the
//! repository ports the auth engine consumes. Persistence adapters
//! implement these ports in other crates.

pub mod user;

pub use user::{NewUser, RoleRepository, Roles, User, UserProfile, UserRepository, UserRole};
