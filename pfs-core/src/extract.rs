use alloc::string::String;
use alloc::vec::Vec;

use crate::{Archive, Entry, Error, Key};

/// Destination for decrypted entries. Each call receives all of an entry's
/// bytes; an error stops the extraction.
pub trait EntrySink {
    type Err: From<Error>;

    fn write_entry(&mut self, entry: &Entry, data: &[u8]) -> Result<(), Self::Err>;
}

/// Collects `(name, plaintext)` pairs in memory
impl EntrySink for Vec<(String, Vec<u8>)> {
    type Err = Error;

    fn write_entry(&mut self, entry: &Entry, data: &[u8]) -> Result<(), Error> {
        self.push((entry.name().into(), data.to_vec()));
        Ok(())
    }
}

/// Decrypt every entry of `archive` in index order and hand it to `sink`.
/// Returns the number of entries written.
pub fn extract<S: EntrySink>(archive: &Archive, key: &Key, sink: &mut S) -> Result<usize, S::Err> {
    let mut count = 0;
    for entry in archive.entries() {
        let data = key.xor(archive.entry_data(entry)?);
        sink.write_entry(entry, &data)?;
        count += 1;
    }
    Ok(count)
}
