//! Sequencing of locate, fetch, extract and cleanup for every resource of a run.
use crate::arch::{Arch, UnsupportedPlatformError};
use crate::archive::extract::ExtractError;
use crate::archive::{ArchiveExtractor, ArchiveFormat, ArchiveJob, Extractor};
use crate::defaults::DEFAULT_PROGRESS_INTERVAL_MS;
use crate::fetcher::{DownloadError, Fetcher, HttpFetcher};
use crate::locator::{FsLocator, Locate, LocateError};
use crate::progress::{ProgressWatcher, SharedProgress};
use crate::reporter::StatusReporter;
use crate::resource::{ResourceSet, ResourceSpec};
use fs::LocalFile;
use fs::directory_manager::{DirectoryManagementError, DirectoryManager, DirectoryManagerFs};
use fs::file_deleter::FileDeleter;
use fs::file_renamer::FileRenamer;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};
use url::Url;

pub type DefaultProvisioner = Provisioner<
    HttpFetcher,
    ArchiveExtractor<DirectoryManagerFs>,
    FsLocator,
    LocalFile,
    DirectoryManagerFs,
>;

/// Suffix of the file a resource used as-is is downloaded to before it replaces the installed one.
const PARTIAL_SUFFIX: &str = "part";

#[derive(Debug, Error)]
pub enum ProvisioningError {
    #[error("unsupported platform: {0}")]
    UnsupportedPlatform(#[from] UnsupportedPlatformError),
    #[error("failed to download {resource}: {source}")]
    Download {
        resource: String,
        source: DownloadError,
    },
    #[error("failed to unpack {resource}: {source}")]
    Extract {
        resource: String,
        source: ExtractError,
    },
    #[error("failed to look for {resource}: {source}")]
    Locate {
        resource: String,
        source: LocateError,
    },
    #[error("{resource} not found after unpack")]
    Consistency { resource: String },
    #[error("cannot prepare work directory `{}`: {source}", path.display())]
    WorkDir {
        path: PathBuf,
        source: DirectoryManagementError,
    },
}

/// Where each resource of a [ResourceSet] ended up.
#[derive(Debug, Clone, PartialEq)]
pub struct Provisioned {
    pub runtime_executable: PathBuf,
    /// Path proving the SDK is installed, its library directory.
    pub sdk_library: Option<PathBuf>,
    pub launcher: PathBuf,
}

pub trait Provision {
    /// Makes every resource present, runtime first, then the SDK, then the launcher.
    /// The first failure aborts the run and leaves earlier resources in place.
    fn provision(&self, resources: &ResourceSet) -> Result<Provisioned, ProvisioningError>;
}

pub struct Provisioner<F, E, L, D, M>
where
    F: Fetcher,
    E: Extractor,
    L: Locate,
    D: FileDeleter + FileRenamer,
    M: DirectoryManager,
{
    pub fetcher: F,
    pub extractor: E,
    pub locator: L,
    pub local_file: D,
    pub directory_manager: M,
    pub reporter: Arc<dyn StatusReporter>,
    pub arch: Arch,
    /// Temporary archives are written here. Created before the first download.
    pub work_dir: PathBuf,
    pub progress_interval: Duration,
}

impl DefaultProvisioner {
    pub fn new(fetcher: HttpFetcher, work_dir: PathBuf, reporter: Arc<dyn StatusReporter>) -> Self {
        Self {
            fetcher,
            extractor: ArchiveExtractor::new(DirectoryManagerFs),
            locator: FsLocator,
            local_file: LocalFile,
            directory_manager: DirectoryManagerFs,
            reporter,
            arch: Arch::current(),
            work_dir,
            progress_interval: Duration::from_millis(DEFAULT_PROGRESS_INTERVAL_MS),
        }
    }
}

impl<F, E, L, D, M> Provisioner<F, E, L, D, M>
where
    F: Fetcher,
    E: Extractor,
    L: Locate,
    D: FileDeleter + FileRenamer,
    M: DirectoryManager,
{
    #[instrument(skip_all, fields(resource = %spec.name))]
    fn ensure(&self, spec: &ResourceSpec) -> Result<PathBuf, ProvisioningError> {
        let url = spec.source.select(&spec.name, &self.arch)?;

        if !spec.always_fetch {
            if let Some(found) = self.locate(spec)? {
                self.reporter.report_status(&format!("{} found.", spec.name));
                return Ok(found);
            }
        }

        match spec.packaging.archive_format(url) {
            Some(format) => self.fetch_and_extract(spec, url, format)?,
            None => self.fetch_file(spec, url)?,
        }

        // The freshly installed tree must satisfy the same probe as an existing one
        let found = self
            .locate(spec)?
            .ok_or_else(|| ProvisioningError::Consistency {
                resource: spec.name.clone(),
            })?;
        info!(path = %found.display(), "Resource installed");
        Ok(found)
    }

    fn locate(&self, spec: &ResourceSpec) -> Result<Option<PathBuf>, ProvisioningError> {
        self.locator
            .locate(spec)
            .map_err(|source| ProvisioningError::Locate {
                resource: spec.name.clone(),
                source,
            })
    }

    /// Downloads the archive next to the install directory and unpacks it. The temporary
    /// archive is deleted whatever the outcome.
    fn fetch_and_extract(
        &self,
        spec: &ResourceSpec,
        url: &Url,
        format: ArchiveFormat,
    ) -> Result<(), ProvisioningError> {
        let archive_path = self
            .work_dir
            .join(format!("{}.{}", spec.name, format.extension()));

        let result = self
            .download(spec, url, &archive_path)
            .and_then(|_| {
                self.reporter
                    .report_status(&format!("Unpacking {}...", spec.name));
                self.reporter.report_progress(0.0);
                let job = ArchiveJob {
                    source: archive_path.clone(),
                    destination: spec.install_path.clone(),
                    format,
                };
                self.extractor
                    .extract(&job)
                    .map_err(|source| ProvisioningError::Extract {
                        resource: spec.name.clone(),
                        source,
                    })
            })
            .inspect_err(|err| warn!("Provisioning failed: {err}"));

        self.discard(&archive_path);
        result
    }

    /// Downloads a resource that is used as-is next to its install path and moves it into
    /// place once complete. A failed download keeps the previously installed file and leaves
    /// no partial file behind.
    fn fetch_file(&self, spec: &ResourceSpec, url: &Url) -> Result<(), ProvisioningError> {
        let partial_path = partial_path(&spec.install_path);

        self.download(spec, url, &partial_path)
            .and_then(|_| {
                self.local_file
                    .rename(&partial_path, &spec.install_path)
                    .map_err(|source| ProvisioningError::Download {
                        resource: spec.name.clone(),
                        source: DownloadError::Io {
                            path: spec.install_path.clone(),
                            source,
                        },
                    })
            })
            .inspect_err(|_| self.discard(&partial_path))
    }

    fn download(
        &self,
        spec: &ResourceSpec,
        url: &Url,
        destination: &Path,
    ) -> Result<(), ProvisioningError> {
        self.directory_manager
            .create(&self.work_dir)
            .map_err(|source| ProvisioningError::WorkDir {
                path: self.work_dir.clone(),
                source,
            })?;

        self.reporter
            .report_status(&format!("Downloading {}...", spec.name));
        self.reporter.report_progress(0.0);
        debug!(%url, destination = %destination.display(), "Downloading resource");

        let progress = SharedProgress::default();
        let watcher = ProgressWatcher::start(
            progress.clone(),
            self.reporter.clone(),
            self.progress_interval,
        )
        .inspect_err(|err| warn!("Download progress will not be reported: {err}"))
        .ok();

        let result = self.fetcher.fetch(url, destination, &progress);
        if let Some(watcher) = watcher {
            watcher.stop();
        }

        result.map_err(|source| ProvisioningError::Download {
            resource: spec.name.clone(),
            source,
        })
    }

    fn discard(&self, path: &Path) {
        match self.local_file.delete(path) {
            Ok(()) => debug!(path = %path.display(), "Temporary file removed"),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => warn!(path = %path.display(), "Could not remove temporary file: {err}"),
        }
    }
}

impl<F, E, L, D, M> Provision for Provisioner<F, E, L, D, M>
where
    F: Fetcher,
    E: Extractor,
    L: Locate,
    D: FileDeleter + FileRenamer,
    M: DirectoryManager,
{
    fn provision(&self, resources: &ResourceSet) -> Result<Provisioned, ProvisioningError> {
        let runtime_executable = self.ensure(&resources.runtime)?;
        let sdk_library = resources
            .sdk
            .as_ref()
            .map(|sdk| self.ensure(sdk))
            .transpose()?;
        let launcher = self.ensure(&resources.launcher)?;

        Ok(Provisioned {
            runtime_executable,
            sdk_library,
            launcher,
        })
    }
}

fn partial_path(install_path: &Path) -> PathBuf {
    let mut file_name = install_path.as_os_str().to_os_string();
    file_name.push(".");
    file_name.push(PARTIAL_SUFFIX);
    PathBuf::from(file_name)
}
