use std::collections::HashMap;
use std::fs::File;
use std::io;
use std::path::Path;

use pfs_core::{Archive, Key};
use pfs_keys::KeyFile;
use tracing::info;

use crate::ext::{copy_and_hash, EntryExt};
use crate::file::ArchiveFile;
use crate::transaction::Transaction;
use crate::{wrap_io_err, Error, READ_WRITE_HASH_BUF_SIZE};

/// Load the key from `key_path`, or recover it from the archive's first PNG
fn get_key(archive: &Archive, key_path: Option<&Path>) -> Result<Key, Error> {
    match key_path {
        Some(key_path) => {
            info!("using key from {}", key_path.display());
            Ok(KeyFile::open(key_path)?.key)
        }
        None => {
            let probe = archive.probe()?;
            info!("recovering key from {}", probe.name());
            Ok(archive.recover_key()?.key)
        }
    }
}

pub fn extract(
    archive_path: impl AsRef<Path>,
    key_path: Option<&Path>,
    base_dir: impl AsRef<Path>,
) -> Result<Key, Error> {
    let file = ArchiveFile::new(archive_path)?;
    let archive = file.archive()?;

    let key = get_key(&archive, key_path)?;
    println!("encryption key: {}", key);

    let mut transaction = Transaction::extract(&archive, &key, base_dir)?;
    let count = transaction.commit()?;
    info!("extracted {} entries from {}", count, file.path().display());

    Ok(key)
}

/// Recover the key and print it, optionally saving it to `out_path`
pub fn key(archive_path: impl AsRef<Path>, out_path: Option<&Path>) -> Result<Key, Error> {
    let file = ArchiveFile::new(archive_path)?;
    let archive = file.archive()?;

    let recovery = archive.recover_key()?;
    println!("{}", recovery.key);

    if let Some(out_path) = out_path {
        KeyFile::new(recovery.key).save(out_path)?;
        info!("saved key to {}", out_path.display());
    }
    Ok(recovery.key)
}

pub fn list(archive_path: impl AsRef<Path>) -> Result<(), Error> {
    let file = ArchiveFile::new(archive_path)?;
    let archive = file.archive()?;

    for entry in archive.entries() {
        println!("{}\t{}\t{}", entry.name(), entry.offset(), entry.size());
    }

    Ok(())
}

/// Check that every entry was extracted under `base_dir` with the right contents
pub fn verify(
    archive_path: impl AsRef<Path>,
    key_path: Option<&Path>,
    base_dir: impl AsRef<Path>,
) -> Result<(), Error> {
    let file = ArchiveFile::new(archive_path)?;
    let archive = file.archive()?;
    let key = get_key(&archive, key_path)?;

    // A later entry with the same name replaced the earlier ones on extraction
    let mut last = HashMap::new();
    for (i, entry) in archive.entries().iter().enumerate() {
        last.insert(entry.check_path()?, i);
    }

    let mut buf = vec![0; READ_WRITE_HASH_BUF_SIZE];
    for (i, entry) in archive.entries().iter().enumerate() {
        let path = entry.check_path()?;
        if last.get(path) != Some(&i) {
            continue;
        }

        let expected_path = base_dir.as_ref().join(path);
        let expected = File::open(&expected_path)
            .map_err(wrap_io_err!(expected_path, "Opening file"))?;

        let (count, hash) = copy_and_hash(expected, io::sink(), &mut buf)
            .map_err(wrap_io_err!(expected_path, "Hashing file"))?;

        let data = key.xor(archive.entry_data(entry)?);
        if count != data.len() as u64 || hash != blake3::hash(&data) {
            return Err(Error::VerifyMismatch {
                entry: entry.name().to_string(),
                path: expected_path,
            });
        }
    }

    Ok(())
}
