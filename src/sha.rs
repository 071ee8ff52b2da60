//! Report identifier generation.
//!
//! Commands that expect a report SHA fall back to a generated token when
//! the caller supplies none (local runs, dev mode). Tokens are shaped
//! like git commit hashes so the service and CI tooling treat them
//! uniformly, but they name nothing outside a single session.

use std::sync::atomic::{AtomicU64, Ordering};

use sha2::{Digest, Sha256};

/// Length of a generated identifier, matching a git SHA-1 hex string.
const TOKEN_LEN: usize = 40;

/// Per-process counter; dev mode generates one token per cycle and
/// coarse clocks could otherwise repeat within a burst.
static COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generates a fresh report identifier.
///
/// Derived from the current time, the process id, and a per-process
/// counter. No collision handling beyond the needs of a single CI run.
#[must_use]
pub fn generate_dev_sha() -> String {
    let now = chrono::Utc::now();
    let nanos = now.timestamp_nanos_opt().unwrap_or_else(|| now.timestamp());

    let mut hasher = Sha256::new();
    hasher.update(nanos.to_le_bytes());
    hasher.update(std::process::id().to_le_bytes());
    hasher.update(COUNTER.fetch_add(1, Ordering::Relaxed).to_le_bytes());

    let mut token = hex::encode(hasher.finalize());
    token.truncate(TOKEN_LEN);
    token
}
