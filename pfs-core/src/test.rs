//! Synthetic archives and PNGs for unit tests
use alloc::vec::Vec;

use crate::{png, Key, HEADER_SIZE};

pub const KEY: Key = Key([
    0x3a, 0x91, 0x07, 0xfe, 0x5c, 0x22, 0xb8, 0x40, 0x6d, 0xe3, 0x19, 0x84, 0xc7, 0x0b, 0x72, 0xaa,
    0x55, 0x9f, 0x31, 0xd6,
]);

pub const ENTRY_TEXT: &[u8] = b"some random string file contents\n";

fn chunk(out: &mut Vec<u8>, tag: &[u8; 4], data: &[u8]) {
    out.extend_from_slice(&(data.len() as u32).to_be_bytes());
    let start = out.len();
    out.extend_from_slice(tag);
    out.extend_from_slice(data);
    let crc = png::checksum(&out[start..]);
    out.extend_from_slice(&crc);
}

/// A small PNG whose second chunk has type `second`
pub fn png(second: &[u8; 4]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&png::HEADER[..8]);

    let mut ihdr = Vec::new();
    ihdr.extend_from_slice(&640u32.to_be_bytes());
    ihdr.extend_from_slice(&480u32.to_be_bytes());
    ihdr.extend_from_slice(&[8, 6, 0, 0, 0]);
    chunk(&mut out, b"IHDR", &ihdr);

    chunk(&mut out, second, &[0, 0, 0x0b, 0x13, 0x01]);
    chunk(&mut out, b"IEND", &[]);
    out
}

/// Header and index only; `entries` are `(name, offset, size)`
pub fn index(entries: &[(&str, u32, u32)]) -> Vec<u8> {
    let mut out = Vec::with_capacity(HEADER_SIZE);
    out.extend_from_slice(b"pf8");
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&(entries.len() as u32).to_le_bytes());
    for (name, offset, size) in entries {
        out.extend_from_slice(&(name.len() as u32).to_le_bytes());
        out.extend_from_slice(name.as_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
        out.extend_from_slice(&offset.to_le_bytes());
        out.extend_from_slice(&size.to_le_bytes());
    }
    out
}

/// Complete archive with each file's data encrypted by `key`
pub fn archive(files: &[(&str, &[u8])], key: &Key) -> Vec<u8> {
    let index_size: usize = files
        .iter()
        .map(|(name, _)| 4 + name.len() + 12)
        .sum();

    let mut offset = (HEADER_SIZE + index_size) as u32;
    let mut entries = Vec::with_capacity(files.len());
    for (name, data) in files {
        entries.push((*name, offset, data.len() as u32));
        offset += data.len() as u32;
    }

    let mut out = index(&entries);
    for (_, data) in files {
        out.extend_from_slice(&key.xor(data));
    }
    out
}

#[test]
fn png_layout() {
    let data = png(b"IDAT");
    assert_eq!(&data[..16], &png::HEADER[..]);
    assert_eq!(&data[png::SECOND_TYPE..png::MIN_PROBE_LEN], b"IDAT");
}

#[test]
fn archive_layout() {
    let data = archive(&[("a", b"xyz")], &KEY);
    assert_eq!(data.len(), HEADER_SIZE + 4 + 1 + 12 + 3);
    assert_eq!(&data[data.len() - 3..], &KEY.xor(b"xyz")[..]);
}
