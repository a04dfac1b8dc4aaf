//! Extention traits for base types defined in `pfs-core`.
use std::io::{self, Read, Write};
use std::path::{Component, Path, PathBuf};

use blake3::{Hash, Hasher};
use pfs_core::Entry;

use crate::transaction::TEMP_PREFIX;
use crate::Error;

pub trait EntryExt {
    fn check_path(&self) -> Result<&Path, Error>;
}

impl EntryExt for Entry {
    /// Iterate the components of the path and ensure that there are no
    /// non-normal components, and at least one normal one. File names
    /// starting with the temp file prefix are rejected too.
    fn check_path(&self) -> Result<&Path, Error> {
        let path = Path::new(self.name());
        for component in path.components() {
            match component {
                Component::Normal(_) => {}
                invalid => {
                    let bad_component: &Path = invalid.as_ref();
                    return Err(Error::InvalidPath {
                        entry: path.to_path_buf(),
                        component: bad_component.to_path_buf(),
                    });
                }
            }
        }
        match path.file_name() {
            Some(file_name) if !file_name.to_string_lossy().starts_with(TEMP_PREFIX) => Ok(path),
            Some(file_name) => Err(Error::InvalidPath {
                entry: path.to_path_buf(),
                component: PathBuf::from(file_name),
            }),
            None => Err(Error::InvalidPath {
                entry: path.to_path_buf(),
                component: path.to_path_buf(),
            }),
        }
    }
}

pub(crate) fn copy_and_hash<R: Read, W: Write>(
    mut read: R,
    mut write: W,
    buf: &mut [u8],
) -> Result<(u64, Hash), io::Error> {
    let mut hasher = Hasher::new();
    let mut total = 0;
    loop {
        let count = read.read(buf)?;
        if count == 0 {
            break;
        }
        total += count as u64;
        write.write_all(&buf[..count])?;
        hasher.update_rayon(&buf[..count]);
    }
    Ok((total, hasher.finalize()))
}
