use super::ArchiveFormat;
use flate2::read::GzDecoder;
use fs::directory_manager::DirectoryManagementError;
use std::fs::{File, create_dir_all};
use std::io::{self, Read};
use std::path::{Component, Path, PathBuf};
use tar::Archive;
use thiserror::Error;
use tracing::{debug, instrument, trace};
use zip::ZipArchive;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("opening archive {}: {source}", path.display())]
    Open { path: PathBuf, source: io::Error },

    #[error("reading {format} archive: {reason}")]
    Read {
        format: ArchiveFormat,
        reason: String,
    },

    #[error("archive entry escapes the destination: {0}")]
    UnsafePath(String),

    #[error("writing {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("preparing destination: {0}")]
    Destination(#[from] DirectoryManagementError),
}

impl ArchiveFormat {
    /// Unpacks `archive_path` into `destination`, dropping the single top-level directory every
    /// entry is expected to live under.
    ///
    /// Extraction is not atomic. On error the destination may be left partially populated.
    #[instrument(skip_all, fields(archive_path = %archive_path.to_string_lossy()), name = "extracting_archive")]
    pub fn extract(&self, archive_path: &Path, destination: &Path) -> Result<(), ExtractError> {
        let file = File::open(archive_path).map_err(|source| ExtractError::Open {
            path: archive_path.to_path_buf(),
            source,
        })?;
        match self {
            ArchiveFormat::TarGz => extract_tar_gz(file, destination),
            ArchiveFormat::Zip => extract_zip(file, destination),
        }
    }
}

fn extract_tar_gz(file: File, destination: &Path) -> Result<(), ExtractError> {
    debug!("Extracting tar.gz archive to '{}'", destination.display());
    let read_error = |err: io::Error| ExtractError::Read {
        format: ArchiveFormat::TarGz,
        reason: err.to_string(),
    };

    let mut archive = Archive::new(GzDecoder::new(file));
    for entry in archive.entries().map_err(read_error)? {
        let mut entry = entry.map_err(read_error)?;
        let name = String::from_utf8_lossy(&entry.path_bytes()).into_owned();
        let Some(relative) = strip_wrapper(&name)? else {
            trace!(entry = name, "Skipping wrapper entry");
            continue;
        };
        let target = destination.join(relative);

        let entry_type = entry.header().entry_type();
        if entry_type.is_dir() {
            create_directory(&target)?;
        } else if entry_type.is_file() {
            let mode = entry.header().mode().map_err(read_error)?;
            write_file(&target, &mut entry, Some(mode))?;
        } else {
            trace!(entry = name, ?entry_type, "Skipping unsupported entry type");
        }
    }
    Ok(())
}

fn extract_zip(file: File, destination: &Path) -> Result<(), ExtractError> {
    debug!("Extracting zip archive to '{}'", destination.display());
    let read_error = |err: zip::result::ZipError| ExtractError::Read {
        format: ArchiveFormat::Zip,
        reason: err.to_string(),
    };

    let mut archive = ZipArchive::new(file).map_err(read_error)?;
    for index in 0..archive.len() {
        let mut entry = archive.by_index(index).map_err(read_error)?;
        let name = entry.name().to_string();
        let Some(relative) = strip_wrapper(&name)? else {
            trace!(entry = name, "Skipping wrapper entry");
            continue;
        };
        let target = destination.join(relative);

        if entry.is_dir() {
            create_directory(&target)?;
            if let Some(mode) = entry.unix_mode() {
                set_mode(&target, mode)?;
            }
        } else if entry.is_file() {
            let mode = entry.unix_mode();
            write_file(&target, &mut entry, mode)?;
        } else {
            trace!(entry = name, "Skipping unsupported entry type");
        }
    }
    Ok(())
}

/// Maps an entry name to a path relative to the destination by discarding its first segment.
/// Returns `None` for the wrapper directory itself.
fn strip_wrapper(entry_name: &str) -> Result<Option<PathBuf>, ExtractError> {
    let mut relative = PathBuf::new();
    for segment in entry_name.split('/').skip(1) {
        if segment.is_empty() || segment == "." {
            continue;
        }
        let is_plain = Path::new(segment)
            .components()
            .all(|component| matches!(component, Component::Normal(_)));
        if !is_plain {
            return Err(ExtractError::UnsafePath(entry_name.to_string()));
        }
        relative.push(segment);
    }
    Ok((!relative.as_os_str().is_empty()).then_some(relative))
}

fn create_directory(path: &Path) -> Result<(), ExtractError> {
    create_dir_all(path).map_err(|source| ExtractError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn write_file(target: &Path, content: &mut impl Read, mode: Option<u32>) -> Result<(), ExtractError> {
    let write_error = |source: io::Error| ExtractError::Write {
        path: target.to_path_buf(),
        source,
    };

    if let Some(parent) = target.parent() {
        create_directory(parent)?;
    }
    let mut file = File::create(target).map_err(write_error)?;
    io::copy(content, &mut file).map_err(write_error)?;

    if let Some(mode) = mode {
        set_mode(target, mode)?;
    }
    Ok(())
}

#[cfg(target_family = "unix")]
fn set_mode(path: &Path, mode: u32) -> Result<(), ExtractError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode & 0o7777)).map_err(
        |source| ExtractError::Write {
            path: path.to_path_buf(),
            source,
        },
    )
}

#[cfg(not(target_family = "unix"))]
fn set_mode(_path: &Path, _mode: u32) -> Result<(), ExtractError> {
    Ok(())
}
