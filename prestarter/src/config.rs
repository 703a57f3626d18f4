//! Compiled-in configuration and its validation.
//!
//! All download locations are baked into the binary at build time through environment variables
//! read with [option_env!]. [BuildConfig] holds the raw values and [BuildConfig::validate] turns
//! them into a [ProvisioningConfig] before any network or filesystem activity happens.
use crate::arch::{Arch, ArchUrls, UnknownArchError};
use crate::defaults::DEFAULT_PROJECT_NAME;
use crate::handoff::LaunchMode;
use crate::http::config::HttpConfig;
use std::path::PathBuf;
use thiserror::Error;
use url::Url;

pub const PROJECT_NAME_VAR: &str = "PRESTARTER_PROJECT_NAME";
pub const RUNTIME_URL_AMD64_VAR: &str = "PRESTARTER_RUNTIME_URL_AMD64";
pub const RUNTIME_URL_ARM64_VAR: &str = "PRESTARTER_RUNTIME_URL_ARM64";
pub const SDK_URL_AMD64_VAR: &str = "PRESTARTER_SDK_URL_AMD64";
pub const SDK_URL_ARM64_VAR: &str = "PRESTARTER_SDK_URL_ARM64";
pub const LAUNCHER_URL_VAR: &str = "PRESTARTER_LAUNCHER_URL";
pub const FALLBACK_ARCH_VAR: &str = "PRESTARTER_FALLBACK_ARCH";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigurationError {
    #[error("required build-time value `{0}` is not configured")]
    Missing(&'static str),
    #[error("invalid URL `{url}` for `{name}`: {reason}")]
    InvalidUrl {
        name: &'static str,
        url: String,
        reason: String,
    },
    #[error("invalid fallback architecture: {0}")]
    InvalidFallback(#[from] UnknownArchError),
}

/// Raw build-time values. Unset values are `None`, values set to an empty string are kept.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildConfig {
    pub project_name: Option<String>,
    pub runtime_url_amd64: Option<String>,
    pub runtime_url_arm64: Option<String>,
    pub sdk_url_amd64: Option<String>,
    pub sdk_url_arm64: Option<String>,
    pub launcher_url: Option<String>,
    pub fallback_arch: Option<String>,
}

/// Validated download locations for every resource the bootstrap provisions.
#[derive(Debug, Clone, PartialEq)]
pub struct ProvisioningConfig {
    pub project_name: String,
    pub runtime_urls: ArchUrls,
    /// `None` when the build does not ship an SDK.
    pub sdk_urls: Option<ArchUrls>,
    pub launcher_url: Url,
    pub fallback_arch: Option<Arch>,
}

impl BuildConfig {
    /// Values compiled into this binary.
    pub fn from_build_env() -> Self {
        Self {
            project_name: option_env!("PRESTARTER_PROJECT_NAME").map(String::from),
            runtime_url_amd64: option_env!("PRESTARTER_RUNTIME_URL_AMD64").map(String::from),
            runtime_url_arm64: option_env!("PRESTARTER_RUNTIME_URL_ARM64").map(String::from),
            sdk_url_amd64: option_env!("PRESTARTER_SDK_URL_AMD64").map(String::from),
            sdk_url_arm64: option_env!("PRESTARTER_SDK_URL_ARM64").map(String::from),
            launcher_url: option_env!("PRESTARTER_LAUNCHER_URL").map(String::from),
            fallback_arch: option_env!("PRESTARTER_FALLBACK_ARCH").map(String::from),
        }
    }

    pub fn validate(&self) -> Result<ProvisioningConfig, ConfigurationError> {
        let project_name = self
            .project_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_PROJECT_NAME)
            .to_string();

        let launcher_url = required_url(LAUNCHER_URL_VAR, self.launcher_url.as_deref())?;

        let runtime_urls = arch_urls(
            (RUNTIME_URL_AMD64_VAR, self.runtime_url_amd64.as_deref()),
            (RUNTIME_URL_ARM64_VAR, self.runtime_url_arm64.as_deref()),
        )?;

        let sdk_enabled = self.sdk_url_amd64.as_deref().is_some_and(|u| !u.is_empty())
            || self.sdk_url_arm64.as_deref().is_some_and(|u| !u.is_empty());
        let sdk_urls = if sdk_enabled {
            Some(arch_urls(
                (SDK_URL_AMD64_VAR, self.sdk_url_amd64.as_deref()),
                (SDK_URL_ARM64_VAR, self.sdk_url_arm64.as_deref()),
            )?)
        } else {
            None
        };

        let fallback_arch = self
            .fallback_arch
            .as_deref()
            .filter(|arch| !arch.trim().is_empty())
            .map(str::parse::<Arch>)
            .transpose()?;

        Ok(ProvisioningConfig {
            project_name,
            runtime_urls,
            sdk_urls,
            launcher_url,
            fallback_arch,
        })
    }
}

/// Builds the URL mapping of a resource. The amd64 URL is the reference build and is required.
fn arch_urls(
    amd64: (&'static str, Option<&str>),
    arm64: (&'static str, Option<&str>),
) -> Result<ArchUrls, ConfigurationError> {
    let mut urls = ArchUrls::new();
    urls.insert(Arch::Amd64, Some(required_url(amd64.0, amd64.1)?));
    if let Some(value) = arm64.1 {
        urls.insert(Arch::Arm64, optional_url(arm64.0, value)?);
    }
    Ok(urls)
}

fn required_url(name: &'static str, value: Option<&str>) -> Result<Url, ConfigurationError> {
    match value {
        Some(value) => optional_url(name, value)?.ok_or(ConfigurationError::Missing(name)),
        None => Err(ConfigurationError::Missing(name)),
    }
}

fn optional_url(name: &'static str, value: &str) -> Result<Option<Url>, ConfigurationError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    let invalid = |reason: String| ConfigurationError::InvalidUrl {
        name,
        url: value.to_string(),
        reason,
    };
    let url = Url::parse(value).map_err(|err| invalid(err.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(Some(url)),
        scheme => Err(invalid(format!("unsupported scheme `{scheme}`"))),
    }
}

/// Settings chosen when the bootstrap is run, as opposed to when it is built.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Directory where resources are installed and temporary archives are written.
    pub work_dir: PathBuf,
    pub launch_mode: LaunchMode,
    /// Skip downloading the launcher artifact when the file is already present.
    pub reuse_launcher: bool,
    pub http: HttpConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            work_dir: PathBuf::from(crate::defaults::DEFAULT_WORK_DIR),
            launch_mode: LaunchMode::default(),
            reuse_launcher: false,
            http: HttpConfig::default(),
        }
    }
}
