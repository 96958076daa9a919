use async_trait::async_trait;

use crate::{
    domain::models::file::{FileContent, FileId},
    services::StorageError,
};

/// A file being written. Nothing is visible in the store until `commit`.
#[async_trait]
pub trait FileSink: Send {
    async fn write(&mut self, chunk: &[u8]) -> Result<(), StorageError>;
    async fn commit(self: Box<Self>) -> Result<FileId, StorageError>;
    /// Throws away everything written so far.
    async fn abort(self: Box<Self>);
}

/// Blob store keyed by [`FileId`]. Files are never mutated or deleted once written.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Starts a file that will be stored under a fresh identifier ending in
    /// `extension` (`pdf` if absent).
    async fn create(&self, extension: Option<&str>) -> Result<Box<dyn FileSink>, StorageError>;
    async fn exists(&self, file_id: &FileId) -> Result<bool, StorageError>;
    /// Byte-for-byte duplicate of `source` under a fresh `.pdf` identifier.
    async fn copy(&self, source: &FileId) -> Result<FileId, StorageError>;
    async fn read(&self, file_id: &FileId) -> Result<FileContent, StorageError>;

    async fn put(&self, content: Vec<u8>, extension: Option<&str>) -> Result<FileId, StorageError> {
        let mut sink = self.create(extension).await?;
        if let Err(e) = sink.write(&content).await {
            sink.abort().await;
            return Err(e);
        }
        sink.commit().await
    }
}
