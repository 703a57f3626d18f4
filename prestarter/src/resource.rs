//! Description of every resource the bootstrap keeps present on disk.
use crate::arch::{Arch, ArchUrls, UnsupportedPlatformError, select_url};
use crate::archive::ArchiveFormat;
use crate::config::{ProvisioningConfig, Settings};
use crate::defaults::{
    LAUNCHER_FILE, LAUNCHER_NAME, RUNTIME_DIRECTORY, RUNTIME_EXECUTABLE, RUNTIME_NAME,
    SDK_DIRECTORY, SDK_MARKER, SDK_NAME,
};
use std::path::{Path, PathBuf};
use url::Url;

#[derive(Debug, Clone, PartialEq)]
pub enum DownloadSource {
    /// Same artifact on every architecture.
    Universal(Url),
    PerArch {
        urls: ArchUrls,
        fallback: Option<Arch>,
    },
}

impl DownloadSource {
    pub fn select(&self, resource: &str, current: &Arch) -> Result<&Url, UnsupportedPlatformError> {
        match self {
            DownloadSource::Universal(url) => Ok(url),
            DownloadSource::PerArch { urls, fallback } => {
                select_url(resource, current, urls, fallback.as_ref())
            }
        }
    }
}

/// How the downloaded bytes become the installed resource.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Packaging {
    /// Unpacked into the install directory. The format is taken from the URL when it has a known
    /// extension, otherwise the given one is assumed.
    Archive(ArchiveFormat),
    /// Written as-is to the install path.
    File,
}

impl Packaging {
    pub fn archive_format(&self, url: &Url) -> Option<ArchiveFormat> {
        match self {
            Packaging::Archive(default) => Some(ArchiveFormat::from_url(url).unwrap_or(*default)),
            Packaging::File => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PresenceProbe {
    /// A regular file with this name and an execute bit somewhere below the install path.
    Executable(String),
    /// Installed when this path exists.
    Marker(PathBuf),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResourceSpec {
    pub name: String,
    pub source: DownloadSource,
    pub install_path: PathBuf,
    pub packaging: Packaging,
    pub probe: PresenceProbe,
    /// Download even when the probe already finds the resource.
    pub always_fetch: bool,
}

impl ResourceSpec {
    fn runtime(config: &ProvisioningConfig, work_dir: &Path) -> Self {
        Self {
            name: RUNTIME_NAME.to_string(),
            source: DownloadSource::PerArch {
                urls: config.runtime_urls.clone(),
                fallback: config.fallback_arch.clone(),
            },
            install_path: work_dir.join(RUNTIME_DIRECTORY),
            packaging: Packaging::Archive(ArchiveFormat::TarGz),
            probe: PresenceProbe::Executable(RUNTIME_EXECUTABLE.to_string()),
            always_fetch: false,
        }
    }

    fn sdk(urls: &ArchUrls, config: &ProvisioningConfig, work_dir: &Path) -> Self {
        let install_path = work_dir.join(SDK_DIRECTORY);
        Self {
            name: SDK_NAME.to_string(),
            source: DownloadSource::PerArch {
                urls: urls.clone(),
                fallback: config.fallback_arch.clone(),
            },
            probe: PresenceProbe::Marker(install_path.join(SDK_MARKER)),
            install_path,
            packaging: Packaging::Archive(ArchiveFormat::Zip),
            always_fetch: false,
        }
    }

    fn launcher(config: &ProvisioningConfig, work_dir: &Path, reuse: bool) -> Self {
        let install_path = work_dir.join(LAUNCHER_FILE);
        Self {
            name: LAUNCHER_NAME.to_string(),
            source: DownloadSource::Universal(config.launcher_url.clone()),
            probe: PresenceProbe::Marker(install_path.clone()),
            install_path,
            packaging: Packaging::File,
            always_fetch: !reuse,
        }
    }
}

/// The resources of one run, provisioned in the order runtime, SDK, launcher.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceSet {
    pub runtime: ResourceSpec,
    pub sdk: Option<ResourceSpec>,
    pub launcher: ResourceSpec,
}

impl ResourceSet {
    pub fn new(config: &ProvisioningConfig, settings: &Settings) -> Self {
        let work_dir = settings.work_dir.as_path();
        Self {
            runtime: ResourceSpec::runtime(config, work_dir),
            sdk: config
                .sdk_urls
                .as_ref()
                .map(|urls| ResourceSpec::sdk(urls, config, work_dir)),
            launcher: ResourceSpec::launcher(config, work_dir, settings.reuse_launcher),
        }
    }
}
