// modgrab-net/src/download.rs
use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::StreamExt;
use modgrab_common::error::{ModError, Result};
use reqwest::Client;
use sha2::{Digest, Sha512};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, error};

use crate::limit::RateLimiter;
use crate::validation::{check_digest, validate_url};

/// Streams `url` into memory, hashing with SHA-512 as chunks arrive. The
/// buffer is only handed back once the computed digest matches the declared
/// one; on a mismatch the bytes are dropped and nothing reaches disk.
pub async fn fetch_verified(
    client: &Client,
    limiter: &RateLimiter,
    filename: &str,
    url: &str,
    sha512_expected: &str,
) -> Result<Vec<u8>> {
    validate_url(url)?;
    limiter.wait().await;

    debug!("Downloading {} from {}", filename, url);
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        error!("HTTP error {} while downloading {}", status, url);
        return Err(ModError::Api(format!("HTTP status {status} from {url}")));
    }

    let mut buffer = Vec::with_capacity(response.content_length().unwrap_or(0) as usize);
    let mut hasher = Sha512::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| ModError::Http(Arc::new(e)))?;
        hasher.update(&chunk);
        buffer.extend_from_slice(&chunk);
    }

    let actual = hex::encode(hasher.finalize());
    check_digest(filename, &actual, sha512_expected)?;
    debug!("Verified {} ({} bytes)", filename, buffer.len());
    Ok(buffer)
}

/// Writes verified bytes to `dir/filename`, staged through a dot-prefixed
/// temp file in the same directory so the final name only ever appears fully
/// written. The directory is created if absent; an existing file is
/// overwritten.
pub async fn write_atomic(dir: &Path, filename: &str, bytes: &[u8]) -> Result<PathBuf> {
    fs::create_dir_all(dir).await?;
    let final_path = dir.join(filename);
    let temp_path = dir.join(format!(".{filename}.download"));

    let mut file = fs::File::create(&temp_path).await?;
    file.write_all(bytes).await?;
    file.flush().await?;
    drop(file);

    fs::rename(&temp_path, &final_path).await?;
    debug!("Wrote {}", final_path.display());
    Ok(final_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn write_atomic_creates_directory_and_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested");
        let path = write_atomic(&target, "mod.jar", b"mod bytes").await.unwrap();
        assert_eq!(path, target.join("mod.jar"));
        assert_eq!(std::fs::read(&path).unwrap(), b"mod bytes");
        // no temp file left behind
        assert!(!target.join(".mod.jar.download").exists());
    }

    #[tokio::test]
    async fn write_atomic_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        write_atomic(dir.path(), "mod.jar", b"old").await.unwrap();
        write_atomic(dir.path(), "mod.jar", b"new").await.unwrap();
        assert_eq!(std::fs::read(dir.path().join("mod.jar")).unwrap(), b"new");
    }
}
