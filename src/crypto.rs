//! Fingerprint primitives for BlockSim
//!
//! Wallet addresses, transaction signatures and block hashes are all SHA-256
//! digests over UTF-8 text, rendered as lowercase hex. They identify content;
//! they do not authenticate anyone.

use sha2::{Digest, Sha256};

/// A wallet address: the hex fingerprint of the wallet name.
pub type Address = String;

/// A 64 character lowercase hex SHA-256 digest.
pub type Fingerprint = String;

/// Sentinel address of the pseudo-party that creates and destroys value.
pub const SYSTEM_ADDRESS: &str = "SYSTEM";

/// Previous-hash sentinel carried by the first block of a chain.
pub const GENESIS_HASH: &str = "GENESIS";

pub const FINGERPRINT_HEX_LEN: usize = 64;

/// Hash the UTF-8 bytes of `data` and return the lowercase hex digest.
pub fn fingerprint(data: &str) -> Fingerprint {
    hex::encode(Sha256::digest(data.as_bytes()))
}

/// Derive a wallet address from its name.
pub fn address_from_string(name: &str) -> Address {
    fingerprint(name)
}

/// Returns true if `s` looks like a rendered fingerprint.
pub fn is_fingerprint(s: &str) -> bool {
    s.len() == FINGERPRINT_HEX_LEN && s.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f'))
}

/// Render a timestamp the way it appears inside fingerprint inputs.
///
/// Shortest round-trip decimal, always with a fractional part, so that
/// `1700000000.0` and `1700000000.25` hash the same way they were written
/// to the state file.
pub fn format_timestamp(timestamp: f64) -> String {
    if timestamp.is_finite() && timestamp.fract() == 0.0 {
        format!("{:.1}", timestamp)
    } else {
        format!("{}", timestamp)
    }
}

/// Current wall-clock time in seconds since the Unix epoch, microsecond resolution.
pub fn now_timestamp() -> f64 {
    chrono::Utc::now().timestamp_micros() as f64 / 1_000_000.0
}

/// Shorten a fingerprint for display, leaving sentinels untouched.
pub fn abbreviate(value: &str, len: usize) -> &str {
    if is_fingerprint(value) && value.len() > len {
        &value[..len]
    } else {
        value
    }
}
