pub mod filesystem;
pub mod writer;

use std::path::PathBuf;

pub use filesystem::{ReservedFile, SaveDirectory};
pub use writer::{BodyWriter, DEFAULT_PART_SIZE};

/// Errors raised while placing or writing an upload
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Path {0:?} does not exist or is not a directory")]
    NotADirectory(PathBuf),

    #[error("Resolved path {0:?} is outside the save directory")]
    OutsideSaveDirectory(PathBuf),

    #[error("No free filename for '{name}' after {attempts} attempts")]
    NamesExhausted { name: String, attempts: usize },

    #[error("Body ended after {received} of {expected} declared bytes")]
    Incomplete { expected: u64, received: u64 },

    #[error("Body stream failed: {0}")]
    Stream(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, StorageError>;
