use async_trait::async_trait;
use tracing::debug;

use crate::{
    application::{error::ApplicationError, services::DocumentEditor},
    domain::models::{
        edit::{EditOperation, EditOutcome},
        file::FileContent,
    },
};

/// Accepts any operation list and leaves the document untouched.
pub struct PassthroughEditor;

#[async_trait]
impl DocumentEditor for PassthroughEditor {
    async fn apply(
        &self,
        _document: FileContent,
        operations: &[EditOperation],
    ) -> Result<EditOutcome, ApplicationError> {
        debug!(operations = operations.len(), "Passing document through unchanged");
        Ok(EditOutcome::Unchanged)
    }
}
