use crate::LocalFile;
use std::fs::rename;
use std::io;
use std::path::Path;
use tracing::instrument;

pub trait FileRenamer {
    /// Moves `from` onto `to`, replacing a file already there.
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;
}

impl FileRenamer for LocalFile {
    #[instrument(skip_all, fields(from = %from.display(), to = %to.display()))]
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        rename(from, to)
    }
}
