use async_trait::async_trait;

use crate::{
    application::error::ApplicationError,
    domain::models::{
        edit::{EditOperation, EditOutcome},
        file::FileContent,
    },
};

#[async_trait]
pub trait DocumentEditor: Send + Sync {
    async fn apply(
        &self,
        document: FileContent,
        operations: &[EditOperation],
    ) -> Result<EditOutcome, ApplicationError>;
}
