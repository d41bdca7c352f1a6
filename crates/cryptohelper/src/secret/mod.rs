//! Process-wide secret material: one AES-256 key and one CBC IV.
//!
//! # Lifecycle
//!
//! 1. [`Config`](crate::config::Config) reads `SECRET_KEY` and `IV` as hex.
//! 2. [`SecretMaterial::from_hex`] decodes and length-checks both, so a bad
//!    value stops startup instead of failing the first request.
//! 3. [`CryptoHelper`](crate::CryptoHelper) holds the material behind an `Arc`;
//!    it is read-only from then on.
//!
//! # Security invariants
//!
//! - Key and IV bytes are never logged and never appear in `Debug` output.
//! - Buffers are zeroed on drop, including the intermediate decoded `Vec`s.

pub mod material;

pub use material::{SecretError, SecretMaterial};
