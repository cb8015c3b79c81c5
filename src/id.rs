//! ID generation utilities for vmlink
//!
//! Provides the short opaque identifiers used to correlate requests with
//! responses, and for init handshakes.

use rand::Rng;

const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Length of generated request IDs
pub const REQUEST_ID_LEN: usize = 8;

/// Generate a request ID
///
/// Format: 8 lowercase base-36 characters.
/// Example: `k3v9x0aq`
///
/// 36^8 (about 2.8e12) possible values keeps collisions negligible for the
/// thousands of requests one channel sees. Uniqueness among in-flight
/// requests is still enforced by the correlation engine.
pub fn generate_request_id() -> String {
    let mut rng = rand::rng();
    (0..REQUEST_ID_LEN)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
        .collect()
}

/// Generate an ID for an init handshake
///
/// Format: `init-{request_id}`
pub fn generate_init_id() -> String {
    format!("init-{}", generate_request_id())
}
