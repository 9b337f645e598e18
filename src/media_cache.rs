//! Idempotent disk-backed media cache.
//!
//! Maps a remote media URL to a local file named after the URL's final path
//! segment. Presence of the file is the only state: a cache hit never touches
//! the network, and a failed download leaves nothing behind.

use std::io::Write;
use std::path::{Path, PathBuf};

use reqwest::header::HeaderMap;
use tempfile::NamedTempFile;
use tracing::{debug, warn};
use url::Url;

/// Disk cache shared by every account pointed at the same directory.
#[derive(Debug, Clone)]
pub struct MediaCache {
    dir: PathBuf,
}

impl MediaCache {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory the cache writes into.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Return the local path for `url`, downloading it on first sight.
    ///
    /// The cache is content-oblivious: once a file with the derived name
    /// exists it is served as-is, with no revalidation against the remote.
    /// Transport failures, non-success statuses, and empty payloads all yield
    /// `None` without a partial write.
    pub async fn fetch_or_get(
        &self,
        client: &reqwest::Client,
        url: &str,
        headers: &HeaderMap,
    ) -> Option<PathBuf> {
        let name = filename_from_url(url)?;
        let path = self.dir.join(&name);
        if path.exists() {
            debug!(%url, path = %path.display(), "media cache hit");
            return Some(path);
        }

        if let Err(e) = tokio::fs::create_dir_all(&self.dir).await {
            warn!(error = %e, dir = %self.dir.display(), "failed to create cache directory");
            return None;
        }

        let response = match client.get(url).headers(headers.clone()).send().await {
            Ok(r) => r,
            Err(e) => {
                debug!(error = %e, %url, "media download failed");
                return None;
            }
        };
        if !response.status().is_success() {
            debug!(status = %response.status(), %url, "media download returned non-success");
            return None;
        }
        let bytes = match response.bytes().await {
            Ok(b) => b,
            Err(e) => {
                debug!(error = %e, %url, "failed to read media body");
                return None;
            }
        };
        if bytes.is_empty() {
            debug!(%url, "media download returned an empty payload");
            return None;
        }

        // Temp file in the same directory, then rename: concurrent fetchers of
        // one filename never observe a torn file.
        match write_atomic(&self.dir, &path, &bytes) {
            Ok(()) => {
                debug!(%url, path = %path.display(), size = bytes.len(), "media cached");
                Some(path)
            }
            Err(e) => {
                warn!(error = %e, path = %path.display(), "failed to write cached media");
                None
            }
        }
    }
}

fn write_atomic(dir: &Path, path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Cache key: the final non-empty path segment of the URL.
///
/// Two distinct images sharing a basename collide silently; the first write
/// wins. Known limitation carried over from the upstream CDN's stable names.
pub(crate) fn filename_from_url(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    parsed
        .path_segments()?
        .filter(|s| !s.is_empty())
        .next_back()
        .map(str::to_owned)
}
