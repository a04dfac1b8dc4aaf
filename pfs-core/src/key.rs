//! Repeating XOR key and its recovery from an encrypted PNG.
//!
//! The first 16 key bytes fall out of the fixed PNG header. Bytes 17 to 19
//! line up with the first three characters of the second chunk's type, whose
//! last character is already readable, so only a handful of chunk types are
//! possible. Byte 16 lines up with the low byte of the second chunk's length
//! and is unconstrained. Bytes 16 to 19 also cover the IHDR width, which is
//! protected by the IHDR CRC, so each (type, byte 16) guess can be checked.
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::{self, Display};

use tracing::{debug, info};

use crate::{png, Error};

pub const KEY_SIZE: usize = 20;

/// Key index paired with the low byte of the second chunk's length
const UNKNOWN_INDEX: usize = (png::SECOND_TYPE - 1) % KEY_SIZE;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Key(pub [u8; KEY_SIZE]);

impl Key {
    /// XOR `data` with the key, starting at key index 0. Applying this twice
    /// gives back the input.
    pub fn xor(&self, data: &[u8]) -> Vec<u8> {
        data.iter()
            .zip(self.0.iter().cycle())
            .map(|(byte, key)| byte ^ key)
            .collect()
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl AsRef<[u8]> for Key {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Result of a successful key recovery
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Recovery {
    pub key: Key,
    /// Type of the probe's second chunk, as guessed during recovery
    pub chunk_type: [u8; 4],
}

/// Recover the key from the encrypted bytes of a PNG entry
pub fn recover(probe: &[u8]) -> Result<Recovery, Error> {
    if probe.len() < png::MIN_PROBE_LEN {
        return Err(Error::ProbeTooShort(probe.len()));
    }

    let known = known_prefix(probe);

    // Bytes 16..20 of the partial key are never read below
    let mut partial = [0; KEY_SIZE];
    partial[..known.len()].copy_from_slice(&known);
    let crc: [u8; 4] = decrypt_span(probe, &partial, png::IHDR_CRC);
    let last = decrypt_span::<1>(probe, &partial, png::SECOND_TYPE + 3)[0];

    let found = png::second_chunk_candidates(last)
        .inspect(|tag| debug!("trying chunk type {}", String::from_utf8_lossy(&tag[..])))
        .flat_map(|tag| (0..=u8::MAX).map(move |byte| (tag, byte)))
        .map(|(tag, byte)| (tag, candidate(&known, probe, tag, byte)))
        .find(|(_, key)| ihdr_checksum(probe, key) == crc);

    match found {
        Some((tag, key)) => {
            info!(
                "recovered key {} (second chunk {})",
                Key(key),
                String::from_utf8_lossy(&tag[..])
            );
            Ok(Recovery {
                key: Key(key),
                chunk_type: *tag,
            })
        }
        None => Err(Error::KeyRecoveryFailed),
    }
}

/// Key bytes covered by the fixed PNG header
fn known_prefix(probe: &[u8]) -> [u8; png::HEADER.len()] {
    let mut known = [0; png::HEADER.len()];
    for (i, byte) in known.iter_mut().enumerate() {
        *byte = probe[i] ^ png::HEADER[i];
    }
    known
}

/// Full key assuming the second chunk type is `tag` and the unknown byte is `byte`
fn candidate(
    known: &[u8; png::HEADER.len()],
    probe: &[u8],
    tag: &[u8; 4],
    byte: u8,
) -> [u8; KEY_SIZE] {
    let mut key = [0; KEY_SIZE];
    key[..known.len()].copy_from_slice(known);
    key[UNKNOWN_INDEX] = byte;
    for (i, c) in tag[..3].iter().enumerate() {
        let pos = png::SECOND_TYPE + i;
        key[pos % KEY_SIZE] = probe[pos] ^ c;
    }
    key
}

/// CRC over the IHDR type and data as decrypted by `key`
fn ihdr_checksum(probe: &[u8], key: &[u8; KEY_SIZE]) -> [u8; 4] {
    let span: [u8; png::IHDR_CRC_SPAN] = decrypt_span(probe, key, png::IHDR_TYPE);
    png::checksum(&span)
}

/// Decrypt `N` bytes of the probe starting at absolute offset `start`
fn decrypt_span<const N: usize>(probe: &[u8], key: &[u8; KEY_SIZE], start: usize) -> [u8; N] {
    let mut out = [0; N];
    for (i, byte) in out.iter_mut().enumerate() {
        let pos = start + i;
        *byte = probe[pos] ^ key[pos % KEY_SIZE];
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::{self, KEY};

    #[test]
    fn unknown_index() {
        assert_eq!(UNKNOWN_INDEX, 16);
    }

    #[test]
    fn xor_is_an_involution() {
        let data: Vec<u8> = (0..=255).collect();
        let encrypted = KEY.xor(&data);
        assert_ne!(encrypted, data);
        assert_eq!(KEY.xor(&encrypted), data);
    }

    #[test]
    fn xor_restarts_every_20_bytes() {
        let encrypted = KEY.xor(&[0; 45]);
        assert_eq!(&encrypted[..20], &KEY.0[..]);
        assert_eq!(&encrypted[20..40], &KEY.0[..]);
        assert_eq!(&encrypted[40..], &KEY.0[..5]);
    }

    #[test]
    fn recovers_exact_key() {
        let probe = KEY.xor(&test::png(b"sRGB"));
        let recovery = recover(&probe).unwrap();
        assert_eq!(recovery.key, KEY);
        assert_eq!(&recovery.chunk_type, b"sRGB");
    }

    #[test]
    fn recovers_past_earlier_candidates() {
        // IDAT, hIST and sBIT share the last character and are tried first
        let probe = KEY.xor(&test::png(b"sPLT"));
        let recovery = recover(&probe).unwrap();
        assert_eq!(recovery.key, KEY);
        assert_eq!(&recovery.chunk_type, b"sPLT");
    }

    #[test]
    fn recovers_every_second_chunk_type() {
        for tag in png::SECOND_CHUNK_TYPES.iter() {
            let probe = KEY.xor(&test::png(tag));
            assert_eq!(recover(&probe).unwrap().key, KEY);
        }
    }

    #[test]
    fn recovery_is_deterministic() {
        let probe = KEY.xor(&test::png(b"IDAT"));
        assert_eq!(recover(&probe).unwrap(), recover(&probe).unwrap());
    }

    #[test]
    fn unknown_second_chunk_type() {
        let probe = KEY.xor(&test::png(b"abcQ"));
        assert!(matches!(recover(&probe), Err(Error::KeyRecoveryFailed)));
    }

    #[test]
    fn corrupted_ihdr_crc() {
        let mut probe = KEY.xor(&test::png(b"IDAT"));
        probe[png::IHDR_CRC] ^= 0x01;
        assert!(matches!(recover(&probe), Err(Error::KeyRecoveryFailed)));
    }

    #[test]
    fn short_probe() {
        let probe = KEY.xor(&test::png(b"IDAT"));
        assert!(matches!(
            recover(&probe[..40]),
            Err(Error::ProbeTooShort(40))
        ));
    }
}
