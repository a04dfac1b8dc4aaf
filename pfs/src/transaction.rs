use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use pfs_core::{Archive, Entry, EntrySink, Key};
use tracing::{debug, warn};

use crate::ext::EntryExt;
use crate::{wrap_io_err, Error};

/// Prefix of the temp files; entries may not use it in their file names
pub(crate) const TEMP_PREFIX: &str = ".pfs.";

/// Temp file next to `target_path` that is renamed over it on commit
fn temp_path(entry: &Entry, target_path: &Path) -> Result<PathBuf, Error> {
    let invalid = || Error::InvalidPath {
        entry: PathBuf::from(entry.name()),
        component: target_path.to_path_buf(),
    };
    let file_name = target_path.file_name().ok_or_else(invalid)?;
    let parent = target_path.parent().ok_or_else(invalid)?;

    Ok(parent.join(format!("{}{}", TEMP_PREFIX, Path::new(file_name).display())))
}

/// Temp file (`.pfs.*`) to target file
struct Rename {
    tmp: PathBuf,
    target: PathBuf,
}

impl Rename {
    fn commit(&self) -> io::Result<()> {
        fs::rename(&self.tmp, &self.target)
    }

    fn abort(&self) -> io::Result<()> {
        fs::remove_file(&self.tmp)
    }
}

/// Writes entries to temp files under a base directory; nothing appears at
/// the target paths until [`Transaction::commit`].
pub struct Transaction {
    base_dir: PathBuf,
    actions: Vec<Rename>,
    /// Directories this transaction created, outermost first
    created_dirs: Vec<PathBuf>,
}

impl Transaction {
    pub fn new(base_dir: impl AsRef<Path>) -> Transaction {
        Transaction {
            base_dir: base_dir.as_ref().to_path_buf(),
            actions: Vec::new(),
            created_dirs: Vec::new(),
        }
    }

    fn create_dir_all(&mut self, dir: &Path) -> Result<(), Error> {
        let missing: Vec<PathBuf> = dir
            .ancestors()
            .take_while(|dir| !dir.as_os_str().is_empty() && !dir.exists())
            .map(Path::to_path_buf)
            .collect();

        fs::create_dir_all(dir).map_err(wrap_io_err!(dir, "Creating directory"))?;
        self.created_dirs.extend(missing.into_iter().rev());
        Ok(())
    }

    /// Decrypt every entry of `archive` into temp files. If any entry fails,
    /// the temp files written so far are removed and the error is returned.
    pub fn extract(
        archive: &Archive,
        key: &Key,
        base_dir: impl AsRef<Path>,
    ) -> Result<Transaction, Error> {
        let mut transaction = Transaction::new(base_dir);
        if let Err(err) = pfs_core::extract(archive, key, &mut transaction) {
            if let Err(abort_err) = transaction.abort() {
                warn!("failed to clean up after extraction error: {}", abort_err);
            }
            return Err(err);
        }
        Ok(transaction)
    }

    /// Number of entries waiting to be committed
    pub fn pending(&self) -> usize {
        self.actions.len()
    }

    pub fn commit(&mut self) -> Result<usize, Error> {
        let mut count = 0;
        while let Some(action) = self.actions.pop() {
            if let Err(source) = action.commit() {
                // Should be possible to restart a failed transaction
                self.actions.push(action);
                return Err(Error::FailedCommit {
                    changed: count,
                    remaining: self.actions.len(),
                    source,
                });
            }
            count += 1;
        }
        self.created_dirs.clear();
        Ok(count)
    }

    /// Clean up any tmp files referenced by this transaction without committing,
    /// then the directories it created. All removals are attempted before an
    /// error is returned; the ones that failed stay in the transaction so this
    /// can be called again.
    pub fn abort(&mut self) -> Result<usize, Error> {
        let mut count = 0;
        let mut failed = Vec::new();
        let mut last_err = None;
        for action in self.actions.drain(..) {
            match action.abort() {
                Ok(()) => count += 1,
                Err(err) => {
                    last_err = Some(err);
                    failed.push(action);
                }
            }
        }
        self.actions = failed;

        let mut kept_dirs = Vec::new();
        while let Some(dir) = self.created_dirs.pop() {
            if let Err(err) = fs::remove_dir(&dir) {
                last_err = Some(err);
                kept_dirs.push(dir);
            }
        }
        kept_dirs.reverse();
        self.created_dirs = kept_dirs;

        match last_err {
            Some(source) => Err(Error::FailedCommit {
                changed: count,
                remaining: self.actions.len(),
                source,
            }),
            None => Ok(count),
        }
    }
}

impl EntrySink for Transaction {
    type Err = Error;

    fn write_entry(&mut self, entry: &Entry, data: &[u8]) -> Result<(), Error> {
        let target = self.base_dir.join(entry.check_path()?);
        let tmp = temp_path(entry, &target)?;
        if let Some(parent) = tmp.parent() {
            self.create_dir_all(parent)?;
        }

        fs::write(&tmp, data).map_err(wrap_io_err!(tmp, "Writing entry to tempfile"))?;
        debug!("wrote {} ({} bytes)", entry.name(), data.len());

        // A later entry with the same name wins; its data already replaced the temp file
        self.actions.retain(|action| action.target != target);
        self.actions.push(Rename { tmp, target });
        Ok(())
    }
}
