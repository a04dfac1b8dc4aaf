use std::error::Error as StdError;
use std::fmt;
use std::io;
use std::path::PathBuf;

#[derive(thiserror::Error)]
pub enum Error {
    #[error("{context} {path:?}")]
    Io {
        #[source]
        source: io::Error,
        path: PathBuf,
        context: &'static str,
    },
    #[error(transparent)]
    Ser(#[from] toml::ser::Error),
    #[error(transparent)]
    Deser(#[from] toml::de::Error),
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{self}")?;

        let mut source = self.source();
        while let Some(err) = source {
            writeln!(f, "\tCaused by: {err}")?;
            source = err.source();
        }

        Ok(())
    }
}
