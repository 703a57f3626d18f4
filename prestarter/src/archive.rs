//! Unpacking of downloaded archives into install directories.
pub mod extract;

use crate::defaults::{TAR_GZ_EXTENSION, ZIP_EXTENSION};
use extract::ExtractError;
use fs::directory_manager::{DirectoryManager, DirectoryManagerFs};
use std::fmt;
use std::path::PathBuf;
use tracing::instrument;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    TarGz,
    Zip,
}

impl ArchiveFormat {
    /// Format implied by the last path segment of `url`, if it has a known extension.
    pub fn from_url(url: &Url) -> Option<Self> {
        let file_name = url.path_segments()?.next_back()?.to_ascii_lowercase();
        if file_name.ends_with(".tar.gz") || file_name.ends_with(".tgz") {
            Some(ArchiveFormat::TarGz)
        } else if file_name.ends_with(".zip") {
            Some(ArchiveFormat::Zip)
        } else {
            None
        }
    }

    /// File extension used for the temporary archive of this format.
    pub fn extension(&self) -> &'static str {
        match self {
            ArchiveFormat::TarGz => TAR_GZ_EXTENSION,
            ArchiveFormat::Zip => ZIP_EXTENSION,
        }
    }
}

impl fmt::Display for ArchiveFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// A single extraction, discarded once it has run.
#[derive(Debug, Clone, PartialEq)]
pub struct ArchiveJob {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub format: ArchiveFormat,
}

pub trait Extractor {
    fn extract(&self, job: &ArchiveJob) -> Result<(), ExtractError>;
}

/// Extracts archives after making sure the destination directory exists.
pub struct ArchiveExtractor<D: DirectoryManager> {
    directory_manager: D,
}

impl<D: DirectoryManager> ArchiveExtractor<D> {
    pub fn new(directory_manager: D) -> Self {
        Self { directory_manager }
    }
}

impl Default for ArchiveExtractor<DirectoryManagerFs> {
    fn default() -> Self {
        Self::new(DirectoryManagerFs)
    }
}

impl<D: DirectoryManager> Extractor for ArchiveExtractor<D> {
    #[instrument(skip_all, fields(destination = %job.destination.display()))]
    fn extract(&self, job: &ArchiveJob) -> Result<(), ExtractError> {
        self.directory_manager.create(&job.destination)?;
        job.format.extract(&job.source, &job.destination)
    }
}
