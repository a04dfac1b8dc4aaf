mod bin;
pub mod ext;
mod file;
mod transaction;

pub use bin::*;
pub use file::ArchiveFile;
pub use transaction::Transaction;

pub use pfs_core as core;
pub use pfs_keys as keys;

use std::io;
use std::path::PathBuf;

const READ_WRITE_HASH_BUF_SIZE: usize = 4 * 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] pfs_core::Error),

    #[error(transparent)]
    Keys(#[from] pfs_keys::Error),

    #[error("{context} {path:?}")]
    Io {
        #[source]
        source: io::Error,
        path: Option<PathBuf>,
        context: &'static str,
    },

    #[error("Invalid path component {component:?} in entry {entry:?}")]
    InvalidPath { entry: PathBuf, component: PathBuf },

    #[error("Failed to commit transaction. {changed} files changed, {remaining} files remaining")]
    FailedCommit {
        changed: usize,
        remaining: usize,
        #[source]
        source: io::Error,
    },

    #[error("{path:?} does not match archive entry {entry:?}")]
    VerifyMismatch { entry: String, path: PathBuf },
}

/// Build a closure that wraps an [`io::Error`] into [`Error::Io`], for use
/// with `map_err`.
#[macro_export]
macro_rules! wrap_io_err {
    ($path:expr, $context:expr) => {
        |source| $crate::Error::Io {
            source,
            path: Some($path.to_path_buf()),
            context: $context,
        }
    };
    ($context:expr) => {
        |source| $crate::Error::Io {
            source,
            path: None,
            context: $context,
        }
    };
}
