use std::{io, path::PathBuf};

use thiserror::Error;

/// Failures that stop processing of an input.
///
/// Malformed records are not errors; see [`crate::record::MalformedRecord`].
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("required field '{0}' is missing from the header")]
    MissingField(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
