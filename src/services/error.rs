use thiserror::Error;

use crate::application::error::ApplicationError;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StorageError {
    /// Maps a missing-file I/O error onto `NotFound` for `file_id`.
    pub(crate) fn from_io(error: std::io::Error, file_id: &str) -> Self {
        if error.kind() == std::io::ErrorKind::NotFound {
            StorageError::NotFound(file_id.to_string())
        } else {
            StorageError::Io(error)
        }
    }
}

impl From<StorageError> for ApplicationError {
    fn from(error: StorageError) -> Self {
        match error {
            StorageError::NotFound(_) => ApplicationError::NotFound,
            StorageError::Io(err) => ApplicationError::InternalError(format!("Storage error: {}", err)),
        }
    }
}
