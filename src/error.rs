use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HuffmanError {
    /// An input or artifact path could not be read or written.
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Sink or reader failure without a known path (in-memory or caller-supplied streams).
    #[error(transparent)]
    Stream(#[from] io::Error),

    #[error("cannot build a tree from an empty frequency table")]
    EmptyFrequencyTable,

    #[error("symbol 0x{0:02x} is not a leaf of the encoding tree")]
    UnknownSymbol(u8),

    #[error("result artifact is empty, ratio is undefined")]
    EmptyArtifact,
}

impl HuffmanError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        HuffmanError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, HuffmanError>;
