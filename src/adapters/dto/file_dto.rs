use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::models::file::FileId;

#[derive(Debug, Serialize)]
pub struct UploadFileResponse {
    #[serde(rename = "fileId")]
    pub file_id: FileId,
}

/// Body of `POST /edit`. Fields stay loosely typed so that any shape
/// mismatch surfaces as the same validation error.
#[derive(Debug, Default, Deserialize)]
pub struct EditFileRequest {
    #[serde(rename = "fileId")]
    pub file_id: Option<Value>,
    pub operations: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct EditFileResponse {
    #[serde(rename = "editedFileId")]
    pub edited_file_id: FileId,
}
