use alloc::string::String;
use core::fmt::Display;

use bytemuck::{Pod, Zeroable};

use crate::Error;

/// File name suffix of entries usable as a key recovery probe
pub const PROBE_SUFFIX: &str = ".png";

/// Fixed-size trailer of each index record, following the variable-length name
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
#[repr(packed, C)]
pub struct EntryTail {
    /// Always skipped
    pub reserved: [u8; 4],
    /// Little endian absolute offset of the file data in the archive
    pub offset: [u8; 4],
    /// Little endian size in bytes of the file data
    pub size: [u8; 4],
}

impl EntryTail {
    pub fn offset(&self) -> u32 {
        u32::from_le_bytes(self.offset)
    }

    pub fn size(&self) -> u32 {
        u32::from_le_bytes(self.size)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry {
    /// Relative path with `/` separators
    name: String,
    offset: u32,
    size: u32,
}

impl Display for Entry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "name={:?} offset={} size={}",
            self.name, self.offset, self.size
        )
    }
}

impl Entry {
    pub fn new(name: impl Into<String>, offset: u32, size: u32) -> Entry {
        Entry {
            name: name.into(),
            offset,
            size,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn is_probe(&self) -> bool {
        self.name.ends_with(PROBE_SUFFIX)
    }

    /// Slice this entry's encrypted bytes out of the archive data
    pub fn data<'a>(&self, archive: &'a [u8]) -> Result<&'a [u8], Error> {
        let out_of_bounds = || Error::EntryOutOfBounds {
            offset: self.offset,
            size: self.size,
            len: archive.len(),
        };
        let start = self.offset as usize;
        let end = start.checked_add(self.size as usize).ok_or_else(out_of_bounds)?;
        archive.get(start..end).ok_or_else(out_of_bounds)
    }
}
