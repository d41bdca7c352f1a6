//! Tracing subscriber setup for processes embedding the helper.
//!
//! The helper itself only emits `tracing` events. A host that already runs
//! its own subscriber receives them there and should not call [`init`]; this
//! is for small binaries and scripts that have none.
//!
//! # Telemetry invariants
//!
//! - No key, IV, plaintext, password or hash content is ever recorded in a
//!   log field; only sizes and error kinds.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Install a global subscriber writing one JSON object per event to stderr.
///
/// `RUST_LOG`, when set, overrides `log_level`. Events are flattened (fields
/// at the top level) and carry their target, e.g.
/// `cryptohelper::crypto::password`, so hosts can filter per module. Span
/// context is omitted; the helper opens no spans.
///
/// Stderr keeps stdout free for a host's own output.
///
/// # Errors
///
/// Returns an error if a global subscriber has already been set.
pub fn init(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .json()
        .flatten_event(true)
        .with_current_span(false)
        .with_span_list(false)
        .with_target(true)
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("tracing subscriber already installed: {e}"))
}
