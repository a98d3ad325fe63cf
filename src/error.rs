use thiserror::Error;

/// Reasons a saved-state blob was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateError {
  #[error("bad magic bytes")]
  BadMagic,

  #[error("unsupported format version {0}")]
  UnsupportedVersion(u8),

  #[error("board dimension {0} is not supported")]
  BadDimension(u8),

  #[error("cell ({row}, {col}) holds {value}, which is not a tile value")]
  BadTile { row: usize, col: usize, value: u32 },

  #[error("blob ends early")]
  Truncated,

  #[error("{0} unexpected bytes after the end of the state")]
  TrailingBytes(usize),
}

#[derive(Error, Debug)]
pub enum Error {
  #[error("no open cell to spawn a tile into")]
  NoOpenCell,

  #[error("invalid saved state: {0}")]
  InvalidState(#[from] StateError),

  #[error("invalid configuration: {0}")]
  Config(String),

  #[error("I/O error: {0}")]
  Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
