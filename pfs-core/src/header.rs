//! The packed structs represent the on-disk format of the pf8 index

use alloc::string::String;
use alloc::vec::Vec;
use bytemuck::{Pod, Zeroable};
use core::mem;
use tracing::warn;

use crate::{Entry, EntryTail, Error, ENTRY_TAIL_SIZE, HEADER_SIZE};

/// Expected archive magic. Other values are tolerated.
pub const MAGIC: [u8; 3] = *b"pf8";

/// Smallest possible index record: name length, empty name, reserved, offset, size
const MIN_ENTRY_SIZE: usize = 4 + ENTRY_TAIL_SIZE;

#[derive(Clone, Copy, Debug, Pod, Zeroable)]
#[repr(packed, C)]
pub struct Header {
    /// Format tag, `pf8` for the archives this crate knows about
    pub magic: [u8; 3],
    /// Little endian size of the info block, not needed to walk the index
    pub info_size: [u8; 4],
    /// Little endian count of index records, which start immediately after
    pub count: [u8; 4],
}

impl Header {
    /// Parse header from the start of the archive data
    pub fn new(data: &[u8]) -> Result<&Header, Error> {
        let bytes = data.get(..HEADER_SIZE).ok_or(Error::Malformed {
            offset: 0,
            needed: HEADER_SIZE,
        })?;
        let header: &Header = bytemuck::try_from_bytes(bytes)?;
        if header.magic != MAGIC {
            warn!("unexpected archive magic {:02x?}", header.magic);
        }
        Ok(header)
    }

    pub fn count(&self) -> u32 {
        u32::from_le_bytes(self.count)
    }

    /// Walk the index that follows the header. `data` is the whole archive,
    /// so offsets in errors are absolute.
    pub fn entries(&self, data: &[u8]) -> Result<Vec<Entry>, Error> {
        let count = self.count() as usize;
        let remaining = data.len().saturating_sub(HEADER_SIZE);
        let mut entries = Vec::with_capacity(count.min(remaining / MIN_ENTRY_SIZE));

        let mut reader = IndexReader {
            data,
            pos: HEADER_SIZE,
        };
        for _ in 0..count {
            let name_len = reader.read_u32()? as usize;
            let name = String::from_utf8_lossy(reader.take(name_len)?).replace('\\', "/");
            let tail: &EntryTail = reader.read()?;
            entries.push(Entry::new(name, tail.offset(), tail.size()));
        }
        Ok(entries)
    }
}

/// Forward-only cursor over the index
struct IndexReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> IndexReader<'a> {
    fn take(&mut self, len: usize) -> Result<&'a [u8], Error> {
        let malformed = || Error::Malformed {
            offset: self.pos,
            needed: len,
        };
        let end = self.pos.checked_add(len).ok_or_else(malformed)?;
        let bytes = self.data.get(self.pos..end).ok_or_else(malformed)?;
        self.pos = end;
        Ok(bytes)
    }

    fn read<T: Pod>(&mut self) -> Result<&'a T, Error> {
        Ok(bytemuck::try_from_bytes(self.take(mem::size_of::<T>())?)?)
    }

    fn read_u32(&mut self) -> Result<u32, Error> {
        self.read::<[u8; 4]>().map(|bytes| u32::from_le_bytes(*bytes))
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;
    use crate::test;

    #[test]
    fn entries_keep_order_and_normalize_separators() {
        let data = test::index(&[("a.txt", 0, 1), ("dir\\b.png", 1, 2)]);
        let header = Header::new(&data).unwrap();
        assert_eq!(header.count(), 2);

        let entries = header.entries(&data).unwrap();
        assert_eq!(entries[0].name(), "a.txt");
        assert_eq!(entries[1].name(), "dir/b.png");
        assert_eq!((entries[1].offset(), entries[1].size()), (1, 2));
    }

    #[test]
    fn short_header() {
        assert!(matches!(
            Header::new(b"pf8\0\0"),
            Err(Error::Malformed { offset: 0, needed: HEADER_SIZE })
        ));
    }

    #[test]
    fn truncated_index() {
        let mut data = test::index(&[("some/file.bin", 0, 4)]);
        // Cut into the offset field of the only record
        data.truncate(HEADER_SIZE + 4 + 13 + 6);
        let header = *Header::new(&data).unwrap();
        assert!(matches!(
            header.entries(&data),
            Err(Error::Malformed { offset, needed: ENTRY_TAIL_SIZE }) if offset == HEADER_SIZE + 4 + 13
        ));
    }

    #[test]
    fn name_longer_than_archive() {
        let mut data = vec![0; HEADER_SIZE];
        data[..3].copy_from_slice(&MAGIC);
        data[7..11].copy_from_slice(&1u32.to_le_bytes());
        data.extend_from_slice(&u32::MAX.to_le_bytes());
        let header = *Header::new(&data).unwrap();
        assert!(matches!(
            header.entries(&data),
            Err(Error::Malformed { offset, needed })
                if offset == HEADER_SIZE + 4 && needed == u32::MAX as usize
        ));
    }

    #[test]
    fn huge_count_does_not_preallocate() {
        let mut data = vec![0; HEADER_SIZE];
        data[7..11].copy_from_slice(&u32::MAX.to_le_bytes());
        let header = *Header::new(&data).unwrap();
        assert!(matches!(
            header.entries(&data),
            Err(Error::Malformed { offset: HEADER_SIZE, needed: 4 })
        ));
    }
}
