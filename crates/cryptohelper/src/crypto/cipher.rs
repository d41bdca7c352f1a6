//! AES-256-CBC encryption and decryption with PKCS#7 padding.
//!
//! **No integrity protection.** CBC without a MAC gives confidentiality only;
//! a tampered ciphertext is caught here only if it happens to break padding.
//!
//! **IV reuse.** Callers of [`encrypt_cbc`] in this crate always pass the one
//! configured IV, so equal plaintexts produce equal ciphertexts. Stored
//! envelopes and pinned vectors depend on that, so it stays.

use aes::Aes256;
use cbc::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use common::{DecryptError, HexField};

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

/// Byte length of an AES-256 key (32 bytes = 256 bits).
pub const KEY_LEN: usize = 32;

/// Byte length of a CBC initialisation vector (one AES block).
pub const IV_LEN: usize = 16;

/// AES block size in bytes.
pub const BLOCK_LEN: usize = 16;

/// Encrypt `plaintext`, padding it to a whole number of blocks.
///
/// Output is always `(plaintext.len() / 16 + 1) * 16` bytes.
pub fn encrypt_cbc(plaintext: &[u8], key: &[u8; KEY_LEN], iv: &[u8; IV_LEN]) -> Vec<u8> {
    Aes256CbcEnc::new(&(*key).into(), &(*iv).into()).encrypt_padded_vec_mut::<Pkcs7>(plaintext)
}

/// Decrypt `ciphertext` and strip its padding.
///
/// # Errors
///
/// Returns [`DecryptError::InvalidCiphertextLength`] if the input is empty or not
/// block-aligned, and [`DecryptError::BadPadding`] if the padding is not valid
/// PKCS#7 (wrong key, wrong IV, or corrupted data).
pub fn decrypt_cbc(
    ciphertext: &[u8],
    key: &[u8; KEY_LEN],
    iv: &[u8; IV_LEN],
) -> Result<Vec<u8>, DecryptError> {
    if ciphertext.is_empty() || ciphertext.len() % BLOCK_LEN != 0 {
        return Err(DecryptError::InvalidCiphertextLength(ciphertext.len()));
    }
    Aes256CbcDec::new(&(*key).into(), &(*iv).into())
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| DecryptError::BadPadding)
}

/// Decode a hex ciphertext. Length is checked later by [`decrypt_cbc`].
pub fn decode_ciphertext(ciphertext_hex: &str) -> Result<Vec<u8>, DecryptError> {
    hex::decode(ciphertext_hex).map_err(|_| DecryptError::InvalidHex {
        field: HexField::Ciphertext,
    })
}

/// Decode a hex IV supplied alongside a ciphertext.
pub fn decode_iv(iv_hex: &str) -> Result<[u8; IV_LEN], DecryptError> {
    let bytes = hex::decode(iv_hex).map_err(|_| DecryptError::InvalidHex {
        field: HexField::Iv,
    })?;
    <[u8; IV_LEN]>::try_from(bytes.as_slice())
        .map_err(|_| DecryptError::InvalidIvLength(bytes.len()))
}
