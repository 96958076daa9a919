mod error;
mod local_storage;
mod memory_storage;
mod passthrough_editor;

pub use error::StorageError;
pub use local_storage::LocalFileStore;
pub use memory_storage::InMemoryFileStore;
pub use passthrough_editor::PassthroughEditor;

use std::{path::Path, sync::Arc};

use crate::{application::services::FileStore, domain::config::local::Provider};

pub fn create_storage_service(provider: &Provider, data_dir: &Path) -> Arc<dyn FileStore> {
    match provider {
        Provider::Local => Arc::new(LocalFileStore::new(data_dir)),
        Provider::Memory => Arc::new(InMemoryFileStore::new()),
    }
}
