//! Argon2 password-hash verification.
//!
//! The hash is a PHC string (`$argon2id$v=19$m=...,t=...,p=...$salt$hash`).
//! Algorithm, version and cost parameters are all taken from the string itself.
//!
//! [`argon_verify`] is fail-closed: every error collapses to `false`.
//!
//! Costs are capped before any work is done: the hash string is caller input,
//! and an oversized `m=` makes Argon2 attempt an allocation whose failure
//! aborts the process rather than returning an error.

use argon2::{
    password_hash::{self, PasswordHash, PasswordVerifier},
    Argon2, Params,
};
use thiserror::Error;
use tracing::warn;

/// Why a verification did not succeed.
#[derive(Debug, Error)]
pub enum VerifyError {
    /// The candidate does not match the hash.
    #[error("password does not match")]
    Mismatch,

    /// The hash string is not a parseable PHC string.
    #[error("malformed password hash: {0}")]
    MalformedHash(password_hash::Error),

    /// The hash parsed, but Argon2 could not check it (unknown algorithm,
    /// unsupported version, out-of-range parameters).
    #[error("argon2 verification error: {0}")]
    Argon2(password_hash::Error),

    /// The hash asks for more memory, passes or lanes than we will spend.
    #[error("argon2 cost out of bounds: m={m_cost} KiB, t={t_cost}, p={p_cost}")]
    ExcessiveCost { m_cost: u32, t_cost: u32, p_cost: u32 },
}

/// Largest accepted memory cost in KiB (1 GiB).
pub const MAX_M_COST: u32 = 1024 * 1024;

/// Largest accepted number of passes.
pub const MAX_T_COST: u32 = 16;

/// Largest accepted degree of parallelism.
pub const MAX_P_COST: u32 = 64;

/// Check `candidate` against `hash`, reporting why it failed.
pub fn verify(hash: &str, candidate: &[u8]) -> Result<(), VerifyError> {
    let parsed = PasswordHash::new(hash).map_err(VerifyError::MalformedHash)?;
    let params = Params::try_from(&parsed).map_err(VerifyError::Argon2)?;
    if params.m_cost() > MAX_M_COST || params.t_cost() > MAX_T_COST || params.p_cost() > MAX_P_COST
    {
        return Err(VerifyError::ExcessiveCost {
            m_cost: params.m_cost(),
            t_cost: params.t_cost(),
            p_cost: params.p_cost(),
        });
    }
    match Argon2::default().verify_password(candidate, &parsed) {
        Ok(()) => Ok(()),
        Err(password_hash::Error::Password) => Err(VerifyError::Mismatch),
        Err(e) => Err(VerifyError::Argon2(e)),
    }
}

/// `true` only if `candidate` matches `hash`.
///
/// Malformed hashes and internal Argon2 errors are logged and reported as `false`.
pub fn argon_verify(hash: &str, candidate: &str) -> bool {
    match verify(hash, candidate.as_bytes()) {
        Ok(()) => true,
        Err(VerifyError::Mismatch) => false,
        Err(
            e @ (VerifyError::MalformedHash(_)
            | VerifyError::Argon2(_)
            | VerifyError::ExcessiveCost { .. }),
        ) => {
            // Never log the hash or candidate.
            warn!(error = %e, "password verification errored; treating as no match");
            false
        }
    }
}
