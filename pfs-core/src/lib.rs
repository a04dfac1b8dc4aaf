#![no_std]
extern crate alloc;

use core::mem;

pub use crate::archive::Archive;
pub use crate::entry::{Entry, EntryTail, PROBE_SUFFIX};
pub use crate::error::Error;
pub use crate::extract::{extract, EntrySink};
pub use crate::header::{Header, MAGIC};
pub use crate::key::{recover, Key, Recovery, KEY_SIZE};

mod archive;
mod entry;
mod error;
mod extract;
mod header;
pub mod key;
pub mod png;
#[cfg(test)]
mod test;

pub const HEADER_SIZE: usize = mem::size_of::<Header>();
pub const ENTRY_TAIL_SIZE: usize = mem::size_of::<EntryTail>();
