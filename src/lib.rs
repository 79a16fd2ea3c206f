//! # keroosha-identity
//!
//! Identity core for Keroosha. Wires configuration, repositories, the
//! token backend and the auth engine into one [`IdentityServices`]
//! container that a transport layer can hold in its shared state.

pub mod bootstrap;
pub mod logging;

pub use bootstrap::{IdentityServices, bootstrap, start};
