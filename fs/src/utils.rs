#[cfg(target_family = "unix")]
use std::fs::Permissions;
use std::path::{Component, Path};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FsError {
    #[error("invalid path: `{0}`")]
    InvalidPath(String),

    #[error("dots disallowed in path `{0}`")]
    DotsDisallowed(String),
}

/// Rejects paths that are not valid unicode or that walk up the tree with `..`.
pub fn validate_path(path: &Path) -> Result<(), FsError> {
    let Some(valid_path) = path.to_str() else {
        return Err(FsError::InvalidPath(format!(
            "{} is not valid unicode",
            path.to_string_lossy()
        )));
    };
    if path.components().any(|c| c == Component::ParentDir) {
        return Err(FsError::DotsDisallowed(valid_path.to_string()));
    }
    Ok(())
}

/// Installed trees are read by the launched process, possibly under another user.
#[cfg(target_family = "unix")]
pub fn get_directory_permissions() -> Permissions {
    use std::os::unix::fs::PermissionsExt;
    Permissions::from_mode(0o755)
}
