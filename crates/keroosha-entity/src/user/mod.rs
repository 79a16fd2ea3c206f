//! User domain entities.

pub mod model;
pub mod repository;
pub mod role;

pub use model::{NewUser, User, UserProfile};
pub use repository::{RoleRepository, UserRepository};
pub use role::{Roles, UserRole};
