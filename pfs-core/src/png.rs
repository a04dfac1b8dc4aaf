//! Fixed PNG layout facts used as known plaintext.
//!
//! See <https://www.w3.org/TR/PNG/#5DataRep> and
//! <https://www.w3.org/TR/PNG/#5Chunk-layout>.

/// Signature followed by the IHDR length (always 13) and type
pub const HEADER: [u8; 16] = [
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52,
];

/// Chunk types that may follow IHDR. IHDR and IEND cannot appear second.
pub const SECOND_CHUNK_TYPES: [[u8; 4]; 19] = [
    *b"PLTE", *b"IDAT", *b"bKGD", *b"cHRM", *b"dSIG", *b"eXIf", *b"gAMA", *b"hIST", *b"iCCP",
    *b"iTXt", *b"pHYs", *b"sBIT", *b"sPLT", *b"sRGB", *b"sTER", *b"tEXt", *b"tIME", *b"tRNS",
    *b"zTXt",
];

/// Length of the IHDR data field
pub const IHDR_DATA_LEN: usize = 13;

/// Offset of the IHDR chunk type, where its CRC coverage starts
pub const IHDR_TYPE: usize = 12;
/// Offset of the IHDR width field
pub const IHDR_WIDTH: usize = 16;
/// Offset of the IHDR CRC
pub const IHDR_CRC: usize = IHDR_TYPE + 4 + IHDR_DATA_LEN;
/// Number of bytes covered by the IHDR CRC (type and data)
pub const IHDR_CRC_SPAN: usize = IHDR_CRC - IHDR_TYPE;

/// Offset of the second chunk's type
pub const SECOND_TYPE: usize = IHDR_CRC + 4 + 4;

/// Shortest data that reaches the end of the second chunk's type
pub const MIN_PROBE_LEN: usize = SECOND_TYPE + 4;

/// CRC-32 as stored in a chunk trailer
pub fn checksum(bytes: &[u8]) -> [u8; 4] {
    crc32fast::hash(bytes).to_be_bytes()
}

/// Second chunk types ending in `last`, in enumeration order
pub fn second_chunk_candidates(last: u8) -> impl Iterator<Item = &'static [u8; 4]> {
    SECOND_CHUNK_TYPES.iter().filter(move |tag| tag[3] == last)
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;

    #[test]
    fn layout() {
        assert_eq!(IHDR_CRC, 29);
        assert_eq!(IHDR_CRC_SPAN, 17);
        assert_eq!(SECOND_TYPE, 37);
        assert_eq!(MIN_PROBE_LEN, 41);
    }

    #[test]
    fn iend_checksum() {
        // Every PNG ends with 00 00 00 00 "IEND" AE 42 60 82
        assert_eq!(checksum(b"IEND"), [0xAE, 0x42, 0x60, 0x82]);
    }

    #[test]
    fn candidates_by_last_char() {
        let found: Vec<_> = second_chunk_candidates(b'T').collect();
        assert_eq!(found, [b"IDAT", b"hIST", b"sBIT", b"sPLT"]);
        assert_eq!(second_chunk_candidates(b'Q').count(), 0);
    }
}
