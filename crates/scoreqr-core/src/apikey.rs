//! Sync-protocol API key: a keyed hash over a fixed salt.
//!
//! Both the server and the offline generator derive
//! `hex(hmac_sha256(secret_key, api_key_salt))`; the server compares the
//! caller-supplied value against its own derivation in constant time.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Derive the API key from the shared secret and salt.
pub fn derive(secret_key: &str, salt: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret_key.as_bytes()).expect("HMAC can take key of any size");
    mac.update(salt.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Constant-time comparison of a supplied key against the expected one.
pub fn verify(expected: &str, provided: &str) -> bool {
    let expected = expected.as_bytes();
    let provided = provided.as_bytes();
    if expected.len() != provided.len() {
        return false;
    }
    expected.ct_eq(provided).into()
}
