//! Filesystem helpers used while provisioning resources on disk.
pub mod directory_manager;
pub mod file_deleter;
pub mod file_renamer;
pub mod utils;

#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFile;

#[cfg(feature = "mocks")]
pub mod mock {
    use super::file_deleter::FileDeleter;
    use super::file_renamer::FileRenamer;
    use mockall::{mock, predicate};
    use std::io;
    use std::path::{Path, PathBuf};

    mock! {
        pub LocalFile {}

        impl FileDeleter for LocalFile {
            fn delete(&self, file_path: &Path) -> io::Result<()>;
        }

        impl FileRenamer for LocalFile {
            fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;
        }
    }

    impl MockLocalFile {
        pub fn should_delete(&mut self, path: &Path) {
            self.expect_delete()
                .with(predicate::eq(PathBuf::from(path)))
                .once()
                .returning(|_| Ok(()));
        }

        pub fn should_not_delete(&mut self, path: &Path, kind: io::ErrorKind) {
            self.expect_delete()
                .with(predicate::eq(PathBuf::from(path)))
                .once()
                .returning(move |_| Err(io::Error::from(kind)));
        }

        pub fn should_rename(&mut self, from: &Path, to: &Path) {
            self.expect_rename()
                .with(
                    predicate::eq(PathBuf::from(from)),
                    predicate::eq(PathBuf::from(to)),
                )
                .once()
                .returning(|_, _| Ok(()));
        }
    }
}
