//! Storage for recovered pf8 keys, so an archive only has to be cracked once.
mod error;

use std::fs;
use std::path::Path;

use pfs_core::Key;
use serde::{Deserialize, Serialize};

pub use error::Error;

mod ser {
    use hex::FromHex;
    use pfs_core::{Key, KEY_SIZE};
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};

    pub(crate) fn to_key<'d, D: Deserializer<'d>>(deser: D) -> Result<Key, D::Error> {
        String::deserialize(deser).and_then(|s| {
            <[u8; KEY_SIZE]>::from_hex(s)
                .map(Key)
                .map_err(|err| Error::custom(err.to_string()))
        })
    }
}

/// Key file format, a TOML table with the key as a hex string:
///
/// ```toml
/// key = "3a9107fe5c22b8406de31984c70b72aa559f31d6"
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct KeyFile {
    #[serde(serialize_with = "hex::serialize", deserialize_with = "ser::to_key")]
    pub key: Key,
}

impl KeyFile {
    pub fn new(key: Key) -> KeyFile {
        KeyFile { key }
    }

    /// Helper function to deserialize.
    pub fn open(file: &Path) -> Result<KeyFile, Error> {
        let s = fs::read_to_string(file).map_err(|source| Error::Io {
            source,
            path: file.to_path_buf(),
            context: "Reading key file",
        })?;

        Ok(toml::from_str(&s)?)
    }

    /// Helper function to serialize and save.
    pub fn save(&self, file: &Path) -> Result<(), Error> {
        fs::write(file, toml::to_string(self)?).map_err(|source| Error::Io {
            source,
            path: file.to_path_buf(),
            context: "Writing key file",
        })
    }
}
