mod edit_service;
mod storage_service;

pub use edit_service::DocumentEditor;
pub use storage_service::{FileSink, FileStore};
