//! Architecture detection and per-architecture download URL selection.
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::warn;
use url::Url;

/// Architecture identifiers used to key download URLs.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Arch {
    Amd64,
    Arm64,
    Other(String),
}

impl Arch {
    /// Architecture the binary was compiled for, which is the one it runs on.
    pub fn current() -> Self {
        Self::from_rust_arch(std::env::consts::ARCH)
    }

    pub fn from_rust_arch(arch: &str) -> Self {
        match arch {
            "x86_64" => Self::Amd64,
            "aarch64" => Self::Arm64,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Amd64 => write!(f, "amd64"),
            Self::Arm64 => write!(f, "arm64"),
            Self::Other(arch) => write!(f, "{arch}"),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
#[error("unknown architecture `{0}`, expected `amd64` or `arm64`")]
pub struct UnknownArchError(String);

impl FromStr for Arch {
    type Err = UnknownArchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "amd64" | "x86_64" => Ok(Self::Amd64),
            "arm64" | "aarch64" => Ok(Self::Arm64),
            _ => Err(UnknownArchError(s.to_string())),
        }
    }
}

/// Download URLs of a resource keyed by architecture.
///
/// A `None` value means the URL was configured but left empty, which is not the same as the
/// architecture having no entry at all. Both are unsupported.
pub type ArchUrls = BTreeMap<Arch, Option<Url>>;

#[derive(Debug, Error, PartialEq)]
pub enum UnsupportedPlatformError {
    #[error("no download URL for {resource} on architecture {arch}")]
    NoMapping { resource: String, arch: Arch },
    #[error("download URL for {resource} is empty on architecture {arch}")]
    EmptyUrl { resource: String, arch: Arch },
}

/// Returns the URL to download `resource` on the `current` architecture.
///
/// When the running architecture has no usable URL and a `fallback` architecture is configured
/// for the resource, the fallback URL is returned and the decision is logged as a warning.
pub fn select_url<'a>(
    resource: &str,
    current: &Arch,
    urls: &'a ArchUrls,
    fallback: Option<&Arch>,
) -> Result<&'a Url, UnsupportedPlatformError> {
    let unsupported = match urls.get(current) {
        Some(Some(url)) => return Ok(url),
        Some(None) => UnsupportedPlatformError::EmptyUrl {
            resource: resource.to_string(),
            arch: current.clone(),
        },
        None => UnsupportedPlatformError::NoMapping {
            resource: resource.to_string(),
            arch: current.clone(),
        },
    };

    let Some(fallback) = fallback.filter(|fallback| *fallback != current) else {
        return Err(unsupported);
    };
    match urls.get(fallback) {
        Some(Some(url)) => {
            warn!(
                resource,
                arch = %current,
                %fallback,
                %url,
                "No download URL for the running architecture, using the {fallback} one instead"
            );
            Ok(url)
        }
        _ => Err(unsupported),
    }
}
