use std::path::PathBuf;

use async_trait::async_trait;
use tokio::{
    fs::{self, File, OpenOptions},
    io::AsyncWriteExt,
};
use tracing::{debug, warn};

use crate::{
    application::services::{FileSink, FileStore},
    domain::models::file::{FileContent, FileId},
    services::error::StorageError,
};

/// Directory-backed store. Each file lives at `<root>/<file id>`.
///
/// Writes land in a hidden `.<file id>.part` staging file first and are
/// renamed into place on commit, so a half-written upload is never
/// reachable through an identifier.
pub struct LocalFileStore {
    root: PathBuf,
}

impl LocalFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, file_id: &FileId) -> PathBuf {
        self.root.join(file_id.as_str())
    }

    async fn ensure_root(&self) -> Result<(), StorageError> {
        fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    async fn open_sink(&self, extension: Option<&str>) -> Result<LocalFileSink, StorageError> {
        self.ensure_root().await?;

        let file_id = FileId::generate(extension);
        let staging_path = self.root.join(format!(".{}.part", file_id));
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&staging_path)
            .await?;

        Ok(LocalFileSink {
            file,
            final_path: self.path_for(&file_id),
            staging_path,
            file_id,
            written: 0,
        })
    }
}

pub struct LocalFileSink {
    file: File,
    file_id: FileId,
    staging_path: PathBuf,
    final_path: PathBuf,
    written: u64,
}

impl LocalFileSink {
    async fn publish(mut self) -> Result<FileId, StorageError> {
        let published = async {
            self.file.flush().await?;
            fs::rename(&self.staging_path, &self.final_path).await
        }
        .await;

        match published {
            Ok(()) => {
                debug!(file_id = %self.file_id, size = self.written, "Stored file");
                Ok(self.file_id)
            }
            Err(e) => {
                self.discard().await;
                Err(e.into())
            }
        }
    }

    async fn discard(self) {
        drop(self.file);
        if let Err(e) = fs::remove_file(&self.staging_path).await {
            warn!(file_id = %self.file_id, "Could not remove staging file: {}", e);
        }
    }
}

#[async_trait]
impl FileSink for LocalFileSink {
    async fn write(&mut self, chunk: &[u8]) -> Result<(), StorageError> {
        self.file.write_all(chunk).await?;
        self.written += chunk.len() as u64;
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<FileId, StorageError> {
        (*self).publish().await
    }

    async fn abort(self: Box<Self>) {
        (*self).discard().await
    }
}

#[async_trait]
impl FileStore for LocalFileStore {
    async fn create(&self, extension: Option<&str>) -> Result<Box<dyn FileSink>, StorageError> {
        Ok(Box::new(self.open_sink(extension).await?))
    }

    async fn exists(&self, file_id: &FileId) -> Result<bool, StorageError> {
        match fs::metadata(self.path_for(file_id)).await {
            Ok(metadata) => Ok(metadata.is_file()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn copy(&self, source: &FileId) -> Result<FileId, StorageError> {
        let mut src = File::open(self.path_for(source))
            .await
            .map_err(|e| StorageError::from_io(e, source.as_str()))?;

        let mut sink = self.open_sink(None).await?;
        match tokio::io::copy(&mut src, &mut sink.file).await {
            Ok(bytes) => {
                sink.written = bytes;
                let file_id = sink.publish().await?;
                debug!(source = %source, file_id = %file_id, "Copied file");
                Ok(file_id)
            }
            Err(e) => {
                sink.discard().await;
                Err(e.into())
            }
        }
    }

    async fn read(&self, file_id: &FileId) -> Result<FileContent, StorageError> {
        let file = File::open(self.path_for(file_id))
            .await
            .map_err(|e| StorageError::from_io(e, file_id.as_str()))?;

        let metadata = file.metadata().await?;
        if !metadata.is_file() {
            return Err(StorageError::NotFound(file_id.to_string()));
        }

        Ok(FileContent {
            size: metadata.len(),
            reader: Box::pin(file),
        })
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;
    use tokio::io::AsyncReadExt;

    use super::*;

    async fn read_all(store: &LocalFileStore, file_id: &FileId) -> Vec<u8> {
        let mut content = store.read(file_id).await.unwrap();
        let mut buf = Vec::new();
        content.reader.read_to_end(&mut buf).await.unwrap();
        assert_eq!(content.size, buf.len() as u64);
        buf
    }

    #[tokio::test]
    async fn put_then_read_returns_same_bytes() {
        let dir = TempDir::new().unwrap();
        let store = LocalFileStore::new(dir.path());

        let file_id = store.put(b"%PDF-1.7 hello".to_vec(), None).await.unwrap();

        assert!(file_id.as_str().ends_with(".pdf"));
        assert!(store.exists(&file_id).await.unwrap());
        assert_eq!(read_all(&store, &file_id).await, b"%PDF-1.7 hello");
        assert!(dir.path().join(file_id.as_str()).is_file());
    }

    #[tokio::test]
    async fn put_uses_suggested_extension() {
        let dir = TempDir::new().unwrap();
        let store = LocalFileStore::new(dir.path());

        let file_id = store.put(vec![0u8; 4], Some("txt")).await.unwrap();

        assert!(file_id.as_str().ends_with(".txt"));
    }

    #[tokio::test]
    async fn root_directory_is_created_on_first_write() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("nested").join("data");
        let store = LocalFileStore::new(&root);

        assert!(!root.exists());
        let missing = FileId::parse("missing.pdf").unwrap();
        assert!(!store.exists(&missing).await.unwrap());
        assert!(!root.exists());

        store.put(Vec::new(), None).await.unwrap();
        assert!(root.is_dir());
    }

    #[tokio::test]
    async fn copy_produces_distinct_identical_files() {
        let dir = TempDir::new().unwrap();
        let store = LocalFileStore::new(dir.path());
        let payload: Vec<u8> = (0..=255u8).cycle().take(100_000).collect();
        let source = store.put(payload.clone(), Some("bin")).await.unwrap();

        let first = store.copy(&source).await.unwrap();
        let second = store.copy(&source).await.unwrap();

        assert_ne!(first, second);
        assert_ne!(first, source);
        assert!(first.as_str().ends_with(".pdf"));
        assert_eq!(read_all(&store, &first).await, payload);
        assert_eq!(read_all(&store, &second).await, payload);
    }

    #[tokio::test]
    async fn copy_of_missing_source_is_not_found() {
        let dir = TempDir::new().unwrap();
        let store = LocalFileStore::new(dir.path());
        let missing = FileId::parse("missing.pdf").unwrap();

        let err = store.copy(&missing).await.unwrap_err();

        assert!(matches!(err, StorageError::NotFound(id) if id == "missing.pdf"));
    }

    #[tokio::test]
    async fn read_of_missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let store = LocalFileStore::new(dir.path());
        let missing = FileId::parse("missing.pdf").unwrap();

        assert!(matches!(
            store.read(&missing).await,
            Err(StorageError::NotFound(_))
        ));
    }

    fn entries(dir: &std::path::Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[tokio::test]
    async fn sink_contents_appear_only_after_commit() {
        let dir = TempDir::new().unwrap();
        let store = LocalFileStore::new(dir.path());

        let mut sink = store.create(Some("pdf")).await.unwrap();
        sink.write(b"first ").await.unwrap();
        sink.write(b"second").await.unwrap();
        let staged = entries(dir.path());
        assert_eq!(staged.len(), 1);
        assert!(staged[0].starts_with('.') && staged[0].ends_with(".part"));

        let file_id = sink.commit().await.unwrap();

        assert_eq!(entries(dir.path()), vec![file_id.to_string()]);
        assert_eq!(read_all(&store, &file_id).await, b"first second");
    }

    #[tokio::test]
    async fn aborted_sink_leaves_nothing_behind() {
        let dir = TempDir::new().unwrap();
        let store = LocalFileStore::new(dir.path());

        let mut sink = store.create(None).await.unwrap();
        sink.write(&[1u8; 1024]).await.unwrap();
        sink.abort().await;

        assert!(entries(dir.path()).is_empty());
    }

    #[tokio::test]
    async fn directories_are_not_reported_as_files() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("subdir")).unwrap();
        let store = LocalFileStore::new(dir.path());
        let id = FileId::parse("subdir").unwrap();

        assert!(!store.exists(&id).await.unwrap());
    }
}
