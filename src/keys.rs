use crate::error::{Result, VodError};
use once_cell::sync::Lazy;
use regex::Regex;
use sha2::{Digest, Sha256};

static LOOKUP_KEY_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new("^[0-9a-f]{64}$").expect("lookup key pattern should compile"));

/// Derives the store's lookup key for a video URL: the lowercase hex
/// SHA-256 digest of the URL's UTF-8 bytes.
///
/// The URL is hashed exactly as supplied. No trimming, lowercasing, or
/// percent-escape rewriting happens here: digests already in the store were
/// computed over the raw string, and two URLs differing only in a query
/// parameter must key different rows.
pub fn compute_lookup_key(url: &str) -> Result<String> {
    if url.is_empty() {
        return Err(VodError::Validation("invalid url".to_string()));
    }

    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    let digest = hex::encode(hasher.finalize());

    // Unreachable with a correct SHA-256, but stored rows are keyed by this
    // exact format so a misbehaving primitive must not go unnoticed.
    if digest.len() != 64 {
        return Err(VodError::HashComputation(format!(
            "digest rendered to {} characters, expected 64",
            digest.len()
        )));
    }

    Ok(digest)
}

/// Whether `candidate` has the shape of a lookup key (64 lowercase hex chars).
pub fn is_lookup_key(candidate: &str) -> bool {
    LOOKUP_KEY_PATTERN.is_match(candidate)
}
