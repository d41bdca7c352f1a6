//! Configuration loading and validation.
//!
//! Values are read from environment variables once, at startup. Loading fails
//! with a descriptive error if the key or IV is missing, not hex, or the wrong
//! length.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::secret::SecretMaterial;

/// Validated helper configuration.
#[derive(Clone, Deserialize)]
pub struct Config {
    /// Hex AES-256 key (`SECRET_KEY`), 32 bytes once decoded. **Required.**
    pub secret_key: String,

    /// Hex CBC IV (`IV`), 16 bytes once decoded. **Required.**
    pub iv: String,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load and validate configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if any required variable is absent or invalid.
    pub fn from_env() -> Result<Self> {
        Self::from_environment(config::Environment::default())
    }

    /// Like [`Config::from_env`], but first seeds the environment from a `.env`
    /// file in the working directory or one of its parents, if there is one.
    /// Variables already set in the process take precedence.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_env()
    }

    /// Like [`Config::load`], but reads the given env file, which must exist.
    /// Variables already set in the process still take precedence.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        dotenvy::from_path(path)
            .with_context(|| format!("failed to read env file {}", path.display()))?;
        Self::from_env()
    }

    /// Load and validate configuration from an explicit set of variables
    /// instead of the process environment. Names are matched case-insensitively.
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let source: config::Map<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self::from_environment(config::Environment::default().source(Some(source)))
    }

    fn from_environment(env: config::Environment) -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(env)
            .build()
            .context("failed to build configuration from environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise configuration")?;

        c.validate()?;
        Ok(c)
    }

    /// Decode the key and IV.
    pub fn secret_material(&self) -> Result<SecretMaterial> {
        SecretMaterial::from_hex(&self.secret_key, &self.iv).context("invalid secret material")
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(&self) -> Result<()> {
        ensure_non_empty(&self.secret_key, "SECRET_KEY")?;
        ensure_non_empty(&self.iv, "IV")?;
        self.secret_material()?;
        Ok(())
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("secret_key", &"[REDACTED]")
            .field("iv", &"[REDACTED]")
            .field("log_level", &self.log_level)
            .finish()
    }
}

fn ensure_non_empty(value: &str, name: &str) -> Result<()> {
    if value.trim().is_empty() {
        anyhow::bail!("{name} is required and must not be empty");
    }
    Ok(())
}
