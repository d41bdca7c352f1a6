//! Cryptographic primitives behind [`CryptoHelper`](crate::CryptoHelper).
//!
//! This module holds no configuration and no secret state: keys and IVs are
//! always passed in by the caller.
//!
//! - [`cipher`]: AES-256-CBC + PKCS#7, hex decoding of envelope parts.
//! - [`digest`]: unsalted SHA-512 hex digest.
//! - [`password`]: fail-closed Argon2 verification.

pub mod cipher;
pub mod digest;
pub mod password;

pub use cipher::{IV_LEN, KEY_LEN};
