//! [`SecretMaterial`]: the validated AES key and IV.

use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::crypto::{IV_LEN, KEY_LEN};

/// Errors produced while decoding secret material.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SecretError {
    /// The named value is not valid hex.
    #[error("{name} is not valid hex")]
    InvalidHex { name: &'static str },

    /// The named value decoded to the wrong number of bytes.
    #[error("{name} has invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength {
        name: &'static str,
        expected: usize,
        actual: usize,
    },
}

/// Fixed-size key and IV buffers.
///
/// Both arrays are overwritten with zeroes on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretMaterial {
    key: [u8; KEY_LEN],
    iv: [u8; IV_LEN],
}

impl SecretMaterial {
    /// Build from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`SecretError::InvalidLength`] unless `key` is [`KEY_LEN`] bytes
    /// and `iv` is [`IV_LEN`] bytes.
    pub fn from_bytes(key: &[u8], iv: &[u8]) -> Result<Self, SecretError> {
        let key: [u8; KEY_LEN] = key.try_into().map_err(|_| SecretError::InvalidLength {
            name: "SECRET_KEY",
            expected: KEY_LEN,
            actual: key.len(),
        })?;
        let iv: [u8; IV_LEN] = iv.try_into().map_err(|_| SecretError::InvalidLength {
            name: "IV",
            expected: IV_LEN,
            actual: iv.len(),
        })?;
        Ok(Self { key, iv })
    }

    /// Build from hex strings as they appear in configuration.
    ///
    /// Surrounding whitespace is ignored; upper- and lowercase hex are both accepted.
    pub fn from_hex(key_hex: &str, iv_hex: &str) -> Result<Self, SecretError> {
        let key = decode("SECRET_KEY", key_hex)?;
        let iv = decode("IV", iv_hex)?;
        Self::from_bytes(&key, &iv)
    }

    pub fn key(&self) -> &[u8; KEY_LEN] {
        &self.key
    }

    pub fn iv(&self) -> &[u8; IV_LEN] {
        &self.iv
    }

    /// Lowercase hex of the configured IV, as returned in every envelope.
    pub fn iv_hex(&self) -> String {
        hex::encode(self.iv)
    }
}

fn decode(name: &'static str, value: &str) -> Result<Zeroizing<Vec<u8>>, SecretError> {
    hex::decode(value.trim())
        .map(Zeroizing::new)
        .map_err(|_| SecretError::InvalidHex { name })
}

impl std::fmt::Debug for SecretMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretMaterial([REDACTED])")
    }
}
