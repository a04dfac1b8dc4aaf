use alloc::vec::Vec;

use crate::key::{self, Recovery};
use crate::{Entry, Error, Header};

/// A parsed archive borrowing its raw data
#[derive(Clone, Debug)]
pub struct Archive<'a> {
    data: &'a [u8],
    header: Header,
    entries: Vec<Entry>,
}

impl<'a> Archive<'a> {
    pub fn parse(data: &'a [u8]) -> Result<Archive<'a>, Error> {
        let header = *Header::new(data)?;
        let entries = header.entries(data)?;
        Ok(Archive {
            data,
            header,
            entries,
        })
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Entries in index order
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Encrypted bytes of `entry`, failing if they lie outside the archive
    pub fn entry_data(&self, entry: &Entry) -> Result<&'a [u8], Error> {
        entry.data(self.data)
    }

    /// First entry that can be used to recover the key
    pub fn probe(&self) -> Result<&Entry, Error> {
        self.entries
            .iter()
            .find(|entry| entry.is_probe())
            .ok_or(Error::MissingProbe)
    }

    pub fn recover_key(&self) -> Result<Recovery, Error> {
        let probe = self.probe()?;
        key::recover(self.entry_data(probe)?)
    }
}
