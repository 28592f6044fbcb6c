//! Session authentication
//!
//! Tamper-evident session tokens and the claims they carry. The codec
//! lives in [`token`]; credential checking is in `services::auth`.

pub mod token;

pub use token::{Claims, TokenCodec, DEFAULT_TOKEN_TTL_SECS};
