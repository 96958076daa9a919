use axum::extract::FromRef;
use std::sync::Arc;

use crate::application::services::{DocumentEditor, FileStore};

#[derive(Clone, FromRef)]
pub struct AppState {
    pub storage_service: Arc<dyn FileStore>,
    pub document_editor: Arc<dyn DocumentEditor>,
    pub limits: UploadLimits,
}

#[derive(Debug, Clone, Copy)]
pub struct UploadLimits {
    /// Largest accepted file payload in bytes.
    pub max_file_bytes: usize,
    pub max_json_bytes: usize,
}
