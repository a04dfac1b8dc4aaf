use alloc::format;
use alloc::string::ToString;
use core::error;
use core::fmt::{Display, Formatter, Result};

#[derive(Debug)]
pub enum Error {
    /// The index asked for `needed` bytes at `offset` but the buffer ended
    Malformed { offset: usize, needed: usize },
    EntryOutOfBounds { offset: u32, size: u32, len: usize },
    MissingProbe,
    ProbeTooShort(usize),
    KeyRecoveryFailed,
    Cast(bytemuck::PodCastError),
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter) -> Result {
        use Error::*;

        let msg = match self {
            Malformed { offset, needed } => format!(
                "Malformed archive: {} bytes needed at offset {}",
                needed, offset
            ),
            EntryOutOfBounds { offset, size, len } => format!(
                "Entry out of bounds: offset={} size={} archive length={}",
                offset, size, len
            ),
            MissingProbe => "No .png entry to recover the key from".to_string(),
            ProbeTooShort(len) => format!("Probe entry too short: {} bytes", len),
            KeyRecoveryFailed => "Key recovery failed: no candidate matched the IHDR CRC".to_string(),
            Cast(err) => format!("Cast: {:?}", err),
        };
        write!(f, "{}", msg)
    }
}

impl error::Error for Error {}

impl From<bytemuck::PodCastError> for Error {
    fn from(err: bytemuck::PodCastError) -> Error {
        Error::Cast(err)
    }
}
