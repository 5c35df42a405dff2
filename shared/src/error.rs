use std::io;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, PartialEq)]
#[non_exhaustive]
pub enum Error {
    #[error("packet writer: buffer full")]
    ErrBufferFull,
    #[error("label must be 1 to 63 bytes")]
    ErrLabelTooLong,
    #[error("encoded name must be at most 255 bytes")]
    ErrNameTooLong,
    #[error("empty label sequence")]
    ErrEmptyLabels,
    #[error("no socket bound for address family")]
    ErrNoSocket,
    #[error("{0}")]
    Io(#[source] IoError),
    #[error("{0}")]
    Other(String),
}

#[derive(Debug, Error)]
#[error("io error: {0}")]
pub struct IoError(#[from] pub io::Error);

// Workaround for wanting PartialEq for io::Error.
impl PartialEq for IoError {
    fn eq(&self, other: &Self) -> bool {
        self.0.kind() == other.0.kind()
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(IoError(e))
    }
}
