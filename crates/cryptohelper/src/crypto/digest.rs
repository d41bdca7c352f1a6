//! Unsalted SHA-512 hex digest.
//!
//! Not a password-storage scheme on its own; it is a plain hashing primitive
//! whose exact output is relied on by existing stored digests.

use sha2::{Digest, Sha512};

/// Length of the hex digest in characters (512 bits).
pub const DIGEST_HEX_LEN: usize = 128;

/// SHA-512 of `input`, lowercase hex.
pub fn sha512_hex(input: impl AsRef<[u8]>) -> String {
    hex::encode(Sha512::digest(input.as_ref()))
}
