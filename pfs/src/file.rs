use std::fs;
use std::path::{Path, PathBuf};

use pfs_core::Archive;

use crate::{wrap_io_err, Error};

/// A pf8 archive read from disk. The whole file is kept in memory, entries
/// are slices of it.
#[derive(Debug)]
pub struct ArchiveFile {
    path: PathBuf,
    data: Vec<u8>,
}

impl ArchiveFile {
    pub fn new(path: impl AsRef<Path>) -> Result<ArchiveFile, Error> {
        let path = path.as_ref().to_path_buf();
        let data = fs::read(&path).map_err(wrap_io_err!(path, "Reading archive"))?;
        Ok(ArchiveFile { path, data })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn archive(&self) -> Result<Archive<'_>, Error> {
        Ok(Archive::parse(&self.data)?)
    }
}
