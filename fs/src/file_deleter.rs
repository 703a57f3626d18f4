use crate::LocalFile;
use std::fs::remove_file;
use std::io;
use std::path::Path;
use tracing::instrument;

pub trait FileDeleter {
    /// Removes a single file. A missing file is reported as [io::ErrorKind::NotFound].
    fn delete(&self, file_path: &Path) -> io::Result<()>;
}

impl FileDeleter for LocalFile {
    #[instrument(skip_all, fields(path = %file_path.display()))]
    fn delete(&self, file_path: &Path) -> io::Result<()> {
        if !file_path.exists() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{}", file_path.display()),
            ));
        }

        remove_file(file_path)
    }
}
