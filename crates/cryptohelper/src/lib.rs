//! `cryptohelper`: key hashing, JSON envelope encryption, and password verification.
//!
//! Startup sequence for an embedding process:
//! 1. Load and validate [`Config`] (`SECRET_KEY`, `IV`, `LOG_LEVEL`; `.env` honoured).
//! 2. Optionally install the JSON tracing subscriber with [`telemetry::init`].
//! 3. Build one [`CryptoHelper`] and clone it wherever it is needed.
//!
//! ```no_run
//! use cryptohelper::{Config, CryptoHelper};
//!
//! # fn main() -> anyhow::Result<()> {
//! let cfg = Config::load()?;
//! cryptohelper::telemetry::init(&cfg.log_level)?;
//! let helper = CryptoHelper::from_config(&cfg)?;
//!
//! let envelope = helper.encrypt_data(&serde_json::json!({"a": 1}))?;
//! let value = helper.decrypt_data(&envelope.encrypted_data, &envelope.iv)?;
//! assert_eq!(value["a"], 1);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod crypto;
pub mod helper;
pub mod secret;
pub mod telemetry;

pub use common::{DecryptError, Envelope, HelperError, HexField};
pub use config::Config;
pub use helper::CryptoHelper;
pub use secret::{SecretError, SecretMaterial};
