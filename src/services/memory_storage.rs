use std::{collections::HashMap, io::Cursor, sync::Arc};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    application::services::{FileSink, FileStore},
    domain::models::file::{FileContent, FileId},
    services::error::StorageError,
};

type Files = Arc<RwLock<HashMap<FileId, Arc<[u8]>>>>;

/// Process-local store; contents vanish with the process.
#[derive(Default)]
pub struct InMemoryFileStore {
    files: Files,
}

impl InMemoryFileStore {
    pub fn new() -> Self {
        Self::default()
    }
}

pub struct InMemoryFileSink {
    files: Files,
    file_id: FileId,
    buffer: Vec<u8>,
}

#[async_trait]
impl FileSink for InMemoryFileSink {
    async fn write(&mut self, chunk: &[u8]) -> Result<(), StorageError> {
        self.buffer.extend_from_slice(chunk);
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<FileId, StorageError> {
        let Self {
            files,
            file_id,
            buffer,
        } = *self;
        files.write().await.insert(file_id.clone(), Arc::from(buffer));
        Ok(file_id)
    }

    async fn abort(self: Box<Self>) {}
}

#[async_trait]
impl FileStore for InMemoryFileStore {
    async fn create(&self, extension: Option<&str>) -> Result<Box<dyn FileSink>, StorageError> {
        Ok(Box::new(InMemoryFileSink {
            files: self.files.clone(),
            file_id: FileId::generate(extension),
            buffer: Vec::new(),
        }))
    }

    async fn exists(&self, file_id: &FileId) -> Result<bool, StorageError> {
        Ok(self.files.read().await.contains_key(file_id))
    }

    async fn copy(&self, source: &FileId) -> Result<FileId, StorageError> {
        let mut files = self.files.write().await;
        let content = files
            .get(source)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(source.to_string()))?;

        let file_id = FileId::generate(None);
        files.insert(file_id.clone(), content);
        Ok(file_id)
    }

    async fn read(&self, file_id: &FileId) -> Result<FileContent, StorageError> {
        let content = self
            .files
            .read()
            .await
            .get(file_id)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(file_id.to_string()))?;

        Ok(FileContent {
            size: content.len() as u64,
            reader: Box::pin(Cursor::new(content)),
        })
    }
}

#[cfg(test)]
mod tests {
    use tokio::io::AsyncReadExt;

    use super::*;

    #[tokio::test]
    async fn behaves_like_a_file_store() {
        let store = InMemoryFileStore::new();
        let source = store.put(b"abc".to_vec(), None).await.unwrap();
        let copy = store.copy(&source).await.unwrap();

        assert_ne!(source, copy);
        assert!(store.exists(&copy).await.unwrap());

        let mut content = store.read(&copy).await.unwrap();
        let mut buf = Vec::new();
        content.reader.read_to_end(&mut buf).await.unwrap();
        assert_eq!(buf, b"abc");
        assert_eq!(content.size, 3);
    }

    #[tokio::test]
    async fn uncommitted_sinks_are_invisible() {
        let store = InMemoryFileStore::new();

        let mut sink = store.create(None).await.unwrap();
        sink.write(b"draft").await.unwrap();
        sink.abort().await;

        assert!(store.files.read().await.is_empty());
    }

    #[tokio::test]
    async fn missing_files_are_not_found() {
        let store = InMemoryFileStore::new();
        let missing = FileId::parse("missing.pdf").unwrap();

        assert!(!store.exists(&missing).await.unwrap());
        assert!(matches!(store.copy(&missing).await, Err(StorageError::NotFound(_))));
        assert!(matches!(store.read(&missing).await, Err(StorageError::NotFound(_))));
    }
}
