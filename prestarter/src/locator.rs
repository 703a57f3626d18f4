//! Read-only checks of whether a resource is already installed.
use crate::resource::{PresenceProbe, ResourceSpec};
use std::fs::{Metadata, read_dir};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, instrument};

#[derive(Debug, Error)]
#[error("scanning {}: {source}", path.display())]
pub struct LocateError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

impl LocateError {
    fn new(path: &Path, source: io::Error) -> Self {
        Self {
            path: path.to_path_buf(),
            source,
        }
    }
}

pub trait Locate {
    /// Returns the path that proves `spec` is installed, or `None` when it is not.
    fn locate(&self, spec: &ResourceSpec) -> Result<Option<PathBuf>, LocateError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct FsLocator;

impl Locate for FsLocator {
    #[instrument(skip_all, fields(resource = %spec.name))]
    fn locate(&self, spec: &ResourceSpec) -> Result<Option<PathBuf>, LocateError> {
        let found = match &spec.probe {
            PresenceProbe::Executable(name) => find_executable(&spec.install_path, name)?,
            PresenceProbe::Marker(path) => path
                .try_exists()
                .map_err(|err| LocateError::new(path, err))?
                .then(|| path.clone()),
        };
        debug!(found = ?found, "Located resource");
        Ok(found)
    }
}

/// Depth-first scan in file name order that stops on the first executable regular file called
/// `name`. A missing directory is not an error.
fn find_executable(dir: &Path, name: &str) -> Result<Option<PathBuf>, LocateError> {
    let entries = match read_dir(dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(LocateError::new(dir, err)),
    };
    let mut entries = entries
        .collect::<Result<Vec<_>, _>>()
        .map_err(|err| LocateError::new(dir, err))?;
    entries.sort_by_key(|entry| entry.file_name());

    for entry in entries {
        let path = entry.path();
        // Symlinks are reported as such and never followed
        let file_type = entry
            .file_type()
            .map_err(|err| LocateError::new(&path, err))?;

        if file_type.is_dir() {
            if let Some(found) = find_executable(&path, name)? {
                return Ok(Some(found));
            }
        } else if file_type.is_file() && entry.file_name() == name {
            let metadata = entry
                .metadata()
                .map_err(|err| LocateError::new(&path, err))?;
            if is_executable(&metadata) {
                return Ok(Some(path));
            }
        }
    }
    Ok(None)
}

#[cfg(target_family = "unix")]
fn is_executable(metadata: &Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o111 != 0
}

#[cfg(not(target_family = "unix"))]
fn is_executable(_metadata: &Metadata) -> bool {
    true
}
