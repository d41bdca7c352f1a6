//! The ciphertext envelope handed back to callers.
//!
//! Field names on the wire are `encryptedData` and `iv`, so envelopes stored
//! by earlier deployments deserialise unchanged.

use serde::{Deserialize, Serialize};

/// Result of one encryption: hex ciphertext plus the hex IV it was produced with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    /// Lowercase hex AES-256-CBC ciphertext (PKCS#7 padded).
    pub encrypted_data: String,
    /// Lowercase hex IV used for this ciphertext.
    pub iv: String,
}

impl Envelope {
    /// Construct an [`Envelope`] from its two hex parts.
    pub fn new(encrypted_data: impl Into<String>, iv: impl Into<String>) -> Self {
        Self {
            encrypted_data: encrypted_data.into(),
            iv: iv.into(),
        }
    }
}
