use std::fmt;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::blocking::{Client, Response};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Google Drive's direct-download endpoint.
const DRIVE_DOWNLOAD_URL: &str = "https://docs.google.com/uc?export=download";

/// Drive sets a cookie with this prefix when a large file needs confirmation.
const DRIVE_WARNING_COOKIE: &str = "download_warning";

/// Bytes read from the network per write to disk.
pub const CHUNK_SIZE: usize = 32_768;

// ---------------------------------------------------------------------------
// Sources and artifacts
// ---------------------------------------------------------------------------

/// Where an artifact's bytes come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactSource {
    /// A Google Drive file id; large files need a confirmation round-trip.
    GoogleDrive { file_id: String },
    /// Any URL served with a plain GET.
    Url(String),
}

impl fmt::Display for ArtifactSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactSource::GoogleDrive { file_id } => write!(f, "Google Drive file {file_id}"),
            ArtifactSource::Url(url) => write!(f, "{url}"),
        }
    }
}

/// A remote file cached at a local path.
#[derive(Debug, Clone)]
pub struct Artifact {
    /// Short human name used in logs ("model", "columns").
    pub label: String,
    pub source: ArtifactSource,
    pub path: PathBuf,
    /// Expected SHA-256 of the downloaded bytes (hex). Checked only on download.
    pub sha256: Option<String>,
}

/// What `ensure_local` had to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnsureOutcome {
    /// The file was already on disk; nothing was fetched.
    Cached,
    /// The file was downloaded; carries the byte count.
    Downloaded(u64),
}

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("request to {url} failed with HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("reading download stream: {0}")]
    Stream(#[source] io::Error),

    #[error("I/O error on {}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("checksum mismatch for {}: expected {expected}, got {actual}", .path.display())]
    ChecksumMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },
}

// ---------------------------------------------------------------------------
// Fetch – the network seam
// ---------------------------------------------------------------------------

/// Opens a remote source as a byte stream.
pub trait Fetch {
    fn open(&self, source: &ArtifactSource) -> Result<Box<dyn Read>, ArtifactError>;
}

/// Blocking HTTP fetcher with a cookie store, so Drive's confirmation
/// handshake can be replayed within one session.
pub struct HttpFetcher {
    client: Client,
    drive_url: String,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, ArtifactError> {
        let client = Client::builder()
            .cookie_store(true)
            .timeout(timeout)
            .build()?;
        Ok(HttpFetcher {
            client,
            drive_url: DRIVE_DOWNLOAD_URL.to_string(),
        })
    }

    /// Send Drive requests to another endpoint instead of Google's.
    pub fn with_drive_url(mut self, url: impl Into<String>) -> Self {
        self.drive_url = url.into();
        self
    }

    fn get_drive_file(&self, file_id: &str) -> Result<Response, ArtifactError> {
        let resp = self
            .client
            .get(&self.drive_url)
            .query(&[("id", file_id)])
            .send()?;

        let token = confirm_token(resp.cookies().map(|c| (c.name().to_string(), c.value().to_string())));
        match token {
            Some(token) => {
                log::debug!("Drive asked for download confirmation (token {token})");
                let confirmed = self
                    .client
                    .get(&self.drive_url)
                    .query(&[("id", file_id), ("confirm", token.as_str())])
                    .send()?;
                Ok(confirmed)
            }
            None => Ok(resp),
        }
    }
}

impl Fetch for HttpFetcher {
    fn open(&self, source: &ArtifactSource) -> Result<Box<dyn Read>, ArtifactError> {
        let resp = match source {
            ArtifactSource::GoogleDrive { file_id } => self.get_drive_file(file_id)?,
            ArtifactSource::Url(url) => self.client.get(url).send()?,
        };

        let status = resp.status();
        if !status.is_success() {
            return Err(ArtifactError::Status {
                url: resp.url().to_string(),
                status: status.as_u16(),
            });
        }
        Ok(Box::new(resp))
    }
}

/// Pick the large-file confirmation token out of a response's cookies.
/// When several warning cookies are present the last one wins.
pub fn confirm_token<I, K, V>(cookies: I) -> Option<String>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<String>,
{
    cookies
        .into_iter()
        .filter(|(name, _)| name.as_ref().starts_with(DRIVE_WARNING_COOKIE))
        .last()
        .map(|(_, value)| value.into())
}

// ---------------------------------------------------------------------------
// ensure_local
// ---------------------------------------------------------------------------

/// Make sure `artifact` exists on disk, downloading it if it does not.
///
/// Presence is the only cache check: an existing file is trusted and no
/// request is made. Downloads stream into a temporary file next to the
/// destination and are renamed into place only once complete (and, when a
/// digest is configured, verified).
pub fn ensure_local(fetcher: &dyn Fetch, artifact: &Artifact) -> Result<EnsureOutcome, ArtifactError> {
    if artifact.path.exists() {
        log::info!(
            "Using cached {} at {}",
            artifact.label,
            artifact.path.display()
        );
        return Ok(EnsureOutcome::Cached);
    }

    log::info!("Downloading {} from {}", artifact.label, artifact.source);
    let bytes = download(fetcher, artifact)?;
    log::info!(
        "Saved {} ({bytes} bytes) to {}",
        artifact.label,
        artifact.path.display()
    );
    Ok(EnsureOutcome::Downloaded(bytes))
}

fn download(fetcher: &dyn Fetch, artifact: &Artifact) -> Result<u64, ArtifactError> {
    let dest = &artifact.path;
    let io_err = |source: io::Error| ArtifactError::Io {
        path: dest.clone(),
        source,
    };

    let dir = match dest.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(io_err)?;

    let mut reader = fetcher.open(&artifact.source)?;
    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(io_err)?;
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; CHUNK_SIZE];
    let mut total: u64 = 0;

    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(ArtifactError::Stream(e)),
        };
        hasher.update(&buf[..n]);
        tmp.write_all(&buf[..n]).map_err(io_err)?;
        total += n as u64;
    }
    tmp.flush().map_err(io_err)?;
    log::debug!("Streamed {total} bytes for {}", artifact.label);

    if let Some(expected) = &artifact.sha256 {
        let actual = hex::encode(hasher.finalize());
        if !actual.eq_ignore_ascii_case(expected.trim()) {
            return Err(ArtifactError::ChecksumMismatch {
                path: dest.clone(),
                expected: expected.trim().to_string(),
                actual,
            });
        }
    }

    tmp.persist(dest).map_err(|e| io_err(e.error))?;
    Ok(total)
}
