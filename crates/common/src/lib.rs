//! Common types and errors shared across `cryptohelper` crates.

pub mod error;
pub mod protocol;

pub use error::{DecryptError, HelperError, HexField};
pub use protocol::Envelope;
