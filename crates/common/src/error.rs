//! Common error types shared across crates.

use thiserror::Error;

/// Top-level helper error type.
///
/// Variants map to stable machine-readable codes returned by [`HelperError::code`]:
/// - [`HelperError::Config`] → `config_error`
/// - [`HelperError::Serialization`] → `serialization_error`
/// - [`HelperError::Decryption`] → `decryption_error`
#[derive(Debug, Error)]
pub enum HelperError {
    /// Secret key or IV is missing, not hex, or the wrong length.
    ///
    /// Only produced while building the helper; callers should treat it as fatal.
    #[error("configuration error: {0}")]
    Config(String),

    /// The value passed to encryption could not be represented as JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// Any failure on the decrypt path.
    #[error("decryption failed: {0}")]
    Decryption(#[from] DecryptError),
}

impl HelperError {
    /// Returns the short machine-readable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            HelperError::Config(_) => "config_error",
            HelperError::Serialization(_) => "serialization_error",
            HelperError::Decryption(_) => "decryption_error",
        }
    }
}

/// Which hex input of a decrypt call was malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HexField {
    Ciphertext,
    Iv,
}

impl std::fmt::Display for HexField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HexField::Ciphertext => f.write_str("ciphertext"),
            HexField::Iv => f.write_str("iv"),
        }
    }
}

/// Distinct failure stages of decryption, in the order they are checked.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecryptError {
    /// Odd-length input or a non-hex character.
    #[error("{field} is not valid hex")]
    InvalidHex { field: HexField },

    /// The decoded IV is not exactly 16 bytes.
    #[error("invalid IV length: expected 16 bytes, got {0}")]
    InvalidIvLength(usize),

    /// The decoded ciphertext is empty or not a whole number of AES blocks.
    #[error("invalid ciphertext length: {0} bytes is not a positive multiple of 16")]
    InvalidCiphertextLength(usize),

    /// PKCS#7 padding check failed: wrong key/IV or corrupted ciphertext.
    #[error("bad padding")]
    BadPadding,

    /// Decrypted bytes are not UTF-8.
    #[error("decrypted data is not valid UTF-8")]
    InvalidUtf8,

    /// Decrypted text is not JSON, or not the JSON shape the caller asked for.
    #[error("decrypted data is not valid JSON: {0}")]
    InvalidJson(String),
}
