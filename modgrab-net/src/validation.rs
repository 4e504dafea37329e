// modgrab-net/src/validation.rs
use modgrab_common::error::{ModError, Result};
use sha2::{Digest, Sha512};
use url::Url;

/// Compares a computed lower-case hex digest against the registry-declared
/// one, case-insensitively.
pub fn check_digest(filename: &str, actual: &str, expected: &str) -> Result<()> {
    tracing::debug!("Calculated SHA512 for {}: {}", filename, actual);
    if actual.eq_ignore_ascii_case(expected) {
        Ok(())
    } else {
        Err(ModError::IntegrityMismatch {
            filename: filename.to_string(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        })
    }
}

/// Verifies the SHA-512 digest of an in-memory buffer.
pub fn verify_sha512(filename: &str, data: &[u8], expected: &str) -> Result<()> {
    let actual = hex::encode(Sha512::digest(data));
    check_digest(filename, &actual, expected)
}

/// Validates a URL, ensuring it uses the HTTPS scheme.
pub fn validate_url(url_str: &str) -> Result<()> {
    let url = Url::parse(url_str)
        .map_err(|e| ModError::Api(format!("Failed to parse URL '{url_str}': {e}")))?;
    if url.scheme() == "https" {
        Ok(())
    } else {
        Err(ModError::Api(format!(
            "Invalid URL scheme for '{}': Must be https, but got '{}'",
            url_str,
            url.scheme()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // sha512 of the ASCII bytes "mod bytes"
    const MOD_BYTES_SHA512: &str = "4997914efe7173e8789b039fe4319c1bc3af48512e0146be48a4750336b4ad9262112098c83aff0c1c1b2de27068c7cb56537d9b6dfe93808291a52f8bf51763";

    #[test]
    fn matching_digest_passes() {
        assert!(verify_sha512("a.jar", b"mod bytes", MOD_BYTES_SHA512).is_ok());
    }

    #[test]
    fn digest_compare_is_case_insensitive() {
        let upper = MOD_BYTES_SHA512.to_uppercase();
        assert!(verify_sha512("a.jar", b"mod bytes", &upper).is_ok());
    }

    #[test]
    fn mismatched_digest_is_an_integrity_error() {
        let err = verify_sha512("a.jar", b"tampered bytes", MOD_BYTES_SHA512).unwrap_err();
        assert!(matches!(err, ModError::IntegrityMismatch { .. }));
    }

    #[test]
    fn rejects_non_https_urls() {
        assert!(validate_url("http://cdn.modrinth.com/file.jar").is_err());
        assert!(validate_url("https://cdn.modrinth.com/file.jar").is_ok());
    }
}
