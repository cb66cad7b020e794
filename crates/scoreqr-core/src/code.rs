//! Authenticity-code alphabet, generation, and normalization.
//!
//! Codes are 12 characters drawn from uppercase letters + digits with the
//! visually confusable `0 O I 1` removed, so operators can transcribe them
//! from print without ambiguity.

use std::collections::HashSet;

use rand::RngExt;

/// Charset for generated codes. `0`, `O`, `I`, and `1` are excluded.
pub const CHARSET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Fixed code length.
pub const CODE_LEN: usize = 12;

/// Cap on regeneration attempts when drawing against an exclusion set.
const MAX_GENERATE_ATTEMPTS: usize = 100;

/// Draw one random code of `len` characters from the restricted alphabet.
///
/// Uses the process CSPRNG; predictability here would defeat the scheme.
pub fn generate(len: usize) -> String {
    let mut rng = rand::rng();
    (0..len)
        .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
        .collect()
}

/// Draw a code not present in `exclusion`.
///
/// The exclusion set is a local optimization to avoid wasted sync
/// round-trips; the store's unique constraint remains the actual
/// uniqueness guarantee. Returns `None` once the attempt cap is hit.
pub fn generate_unique(len: usize, exclusion: &HashSet<String>) -> Option<String> {
    for _ in 0..MAX_GENERATE_ATTEMPTS {
        let candidate = generate(len);
        if !exclusion.contains(&candidate) {
            return Some(candidate);
        }
    }
    None
}

/// Trim and uppercase a raw code as submitted by a client.
pub fn normalize(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// A code is well-formed when its normalized form is exactly [`CODE_LEN`]
/// characters. Charset membership is not re-checked on the read path — the
/// store lookup rejects anything that was never issued.
pub fn is_well_formed(normalized: &str) -> bool {
    normalized.chars().count() == CODE_LEN
}
