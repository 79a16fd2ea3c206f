//! Signed, self-contained token backend.

pub mod claims;
pub mod decoder;
pub mod encoder;
pub mod storage;

pub use claims::Claims;
pub use decoder::JwtDecoder;
pub use encoder::JwtEncoder;
pub use storage::JwtTokenStorage;
