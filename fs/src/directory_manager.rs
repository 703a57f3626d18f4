use super::utils::{FsError, validate_path};
use std::fs::DirBuilder;
use std::path::Path;
use thiserror::Error;
use tracing::instrument;

#[derive(Error, Debug, Clone)]
pub enum DirectoryManagementError {
    #[error("cannot create directory '{0}' : {1}")]
    ErrorCreatingDirectory(String, String),

    #[error("invalid directory: {0}")]
    InvalidDirectory(#[from] FsError),
}

pub trait DirectoryManager {
    /// Creates the folder and any missing parent. Existing folders are not an error.
    fn create(&self, path: &Path) -> Result<(), DirectoryManagementError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DirectoryManagerFs;

impl DirectoryManager for DirectoryManagerFs {
    #[instrument(skip_all, fields(path = %path.display()))]
    fn create(&self, path: &Path) -> Result<(), DirectoryManagementError> {
        validate_path(path)?;
        let mut directory_builder = DirBuilder::new();
        directory_builder.recursive(true);
        #[cfg(target_family = "unix")]
        {
            use std::os::unix::fs::DirBuilderExt;
            use std::os::unix::fs::PermissionsExt;
            directory_builder.mode(crate::utils::get_directory_permissions().mode());
        }
        directory_builder.create(path).map_err(|e| {
            DirectoryManagementError::ErrorCreatingDirectory(
                path.to_string_lossy().to_string(),
                e.to_string(),
            )
        })
    }
}

////////////////////////////////////////////////////////////////////////////////////
// Mock
////////////////////////////////////////////////////////////////////////////////////
#[cfg(feature = "mocks")]
pub mod mock {
    use super::*;
    use mockall::{mock, predicate};
    use std::path::PathBuf;

    mock! {
        pub DirectoryManager {}

        impl DirectoryManager for DirectoryManager {
            fn create(&self, path: &Path) -> Result<(), DirectoryManagementError>;
        }
    }

    impl MockDirectoryManager {
        pub fn should_create(&mut self, path: &Path) {
            self.expect_create()
                .with(predicate::eq(PathBuf::from(path)))
                .once()
                .returning(|_| Ok(()));
        }

        pub fn should_not_create(&mut self, path: &Path, err: DirectoryManagementError) {
            self.expect_create()
                .with(predicate::eq(PathBuf::from(path)))
                .once()
                .returning(move |_| Err(err.clone()));
        }
    }
}
