//! Short content tags for generated bundle files.
//!
//! A tag is a fixed-width, alphanumeric fingerprint of a byte string. It is
//! embedded in the header of every file this tool writes, and recomputed on
//! the next run to tell our own output apart from pristine upstream files.
//!
//! The digest is SHA-256 over a fixed personalization prefix followed by the
//! content, encoded with the URL-safe base64 alphabet. The two non-alphanumeric
//! characters of that alphabet (`-`, `_`) are dropped so the tag is safe in
//! file names and comment lines. When dropping them leaves too few characters,
//! the digest is re-hashed (chained) and the new characters are appended.

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use sha2::{Digest, Sha256};

/// Width of the tag embedded in generated-file headers.
pub const TAG_LENGTH: usize = 10;

/// Domain separation so tags never collide with plain SHA-256 of the content.
const PERSONALIZATION: &[u8] = b"trustfilter.tag.v1\0";

/// Compute a deterministic tag of exactly `desired_length` characters.
pub fn short_hash(content: &[u8], desired_length: usize) -> String {
    let mut tag = String::with_capacity(desired_length);
    let mut digest = keyed_digest(content);

    loop {
        tag.extend(
            URL_SAFE_NO_PAD
                .encode(digest)
                .chars()
                .filter(|c| *c != '-' && *c != '_'),
        );
        if tag.len() >= desired_length {
            break;
        }
        digest = keyed_digest(&digest);
    }

    tag.truncate(desired_length);
    tag
}

fn keyed_digest(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(PERSONALIZATION);
    hasher.update(data);
    hasher.finalize().into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_is_stable() {
        let first = short_hash(b"", TAG_LENGTH);
        let second = short_hash(b"", TAG_LENGTH);

        assert_eq!(first.len(), TAG_LENGTH);
        assert_eq!(first, second);
    }

    #[test]
    fn test_known_values() {
        // Tags in generated headers already on disk must keep verifying.
        assert_eq!(short_hash(b"", TAG_LENGTH), "XOT0mF8wf3");
        assert_eq!(
            short_hash(b"", 60),
            "XOT0mF8wf3FLRbzkAzwSAHc1jgFJb6w95E9kWJCFVsk3vJto5gJgMGEigLvK"
        );
    }

    #[test]
    fn test_tag_is_alphanumeric() {
        for input in [&b""[..], b"a", b"[p11-kit-object-v1]\n", &[0xff; 64]] {
            let tag = short_hash(input, TAG_LENGTH);
            assert!(tag.chars().all(|c| c.is_ascii_alphanumeric()), "{tag}");
        }
    }

    #[test]
    fn test_different_content_different_tag() {
        assert_ne!(
            short_hash(b"label: \"A\"\n", TAG_LENGTH),
            short_hash(b"label: \"B\"\n", TAG_LENGTH)
        );
    }

    #[test]
    fn test_long_tags_chain_digests() {
        // A single digest encodes to 43 characters before stripping.
        let tag = short_hash(b"content", 200);
        assert_eq!(tag.len(), 200);
        assert!(tag.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_shorter_tag_is_prefix_of_longer() {
        let short = short_hash(b"content", 10);
        let long = short_hash(b"content", 60);
        assert!(long.starts_with(&short));
    }

    #[test]
    fn test_zero_length() {
        assert_eq!(short_hash(b"content", 0), "");
    }
}
