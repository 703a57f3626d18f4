//! Streams HTTP downloads to disk.
use crate::http::client::{ReqwestBuildError, try_build_reqwest_client};
use crate::http::config::HttpConfig;
use crate::progress::SharedProgress;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

const CHUNK_SIZE: usize = 64 * 1024;

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("bad status downloading {url}: {status}")]
    Status { url: String, status: StatusCode },
    #[error("downloading {url}: {reason}")]
    Transport { url: String, reason: String },
    #[error("writing {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },
}

/// Downloads a URL into a file, reporting transferred bytes to `progress`.
///
/// A non-success status fails before anything is written. Any other failure may leave a
/// partial file behind which must be treated as garbage; there is no resume.
pub trait Fetcher {
    fn fetch(
        &self,
        url: &Url,
        destination: &Path,
        progress: &SharedProgress,
    ) -> Result<(), DownloadError>;
}

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn try_new(config: HttpConfig) -> Result<Self, ReqwestBuildError> {
        Ok(Self::new(try_build_reqwest_client(config)?))
    }
}

impl Fetcher for HttpFetcher {
    #[instrument(skip_all, fields(%url, destination = %destination.display()), name = "fetching_url")]
    fn fetch(
        &self,
        url: &Url,
        destination: &Path,
        progress: &SharedProgress,
    ) -> Result<(), DownloadError> {
        let transport_error = |reason: String| DownloadError::Transport {
            url: url.to_string(),
            reason,
        };
        let io_error = |source: io::Error| DownloadError::Io {
            path: destination.to_path_buf(),
            source,
        };

        let mut response = self
            .client
            .get(url.clone())
            .send()
            .map_err(|err| transport_error(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::Status {
                url: url.to_string(),
                status,
            });
        }

        let total = response.content_length();
        debug!(total, "Download started");
        progress.reset(total);

        let mut file = File::create(destination).map_err(io_error)?;
        let mut buffer = vec![0; CHUNK_SIZE];
        let mut written: u64 = 0;
        loop {
            let read = match response.read(&mut buffer) {
                Ok(0) => break,
                Ok(read) => read,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(transport_error(err.to_string())),
            };
            file.write_all(&buffer[..read]).map_err(io_error)?;
            written += read as u64;
            progress.advance(read as u64);
        }
        // Ensure all data is flushed to disk before returning
        file.sync_data().map_err(io_error)?;

        debug!(written, "Download completed");
        Ok(())
    }
}
