use axum::{
    body::Body,
    extract::{
        multipart::{Field, MultipartError, MultipartRejection},
        rejection::JsonRejection,
        Multipart, Path, State,
    },
    http::{header, StatusCode},
    response::Response,
    Json,
};
use serde_json::Value;
use tokio_util::io::ReaderStream;
use tracing::{info, warn};

use crate::{
    adapters::{
        dto::file_dto::{EditFileRequest, EditFileResponse, UploadFileResponse},
        state::AppState,
    },
    application::{
        error::ApplicationError,
        services::{FileSink, FileStore},
    },
    domain::models::{
        edit::{EditOperation, EditOutcome},
        file::{filename_extension, FileId, DEFAULT_EXTENSION},
    },
    services::StorageError,
};

const FILE_FIELD: &str = "file";
const FILE_FIELD_ALIASES: [&str; 2] = ["pdf", "document"];
const PDF_CONTENT_TYPE: &str = "application/pdf";

const FILE_REQUIRED: &str = "file is required";
const EDIT_FIELDS_REQUIRED: &str = "fileId and operations required";
const FILE_ID_NOT_FOUND: &str = "fileId not found";

pub struct FileController;

impl FileController {
    /// POST /upload
    /// Multipart body with the payload under `file` (or, failing that, `pdf` / `document`).
    pub async fn upload_file(
        State(app_state): State<AppState>,
        multipart: Result<Multipart, MultipartRejection>,
    ) -> Result<Json<UploadFileResponse>, ApplicationError> {
        let mut multipart = multipart.map_err(|e| {
            warn!("Upload without a multipart body: {}", e);
            ApplicationError::BadRequest(FILE_REQUIRED.to_string())
        })?;

        let mut pending: Option<PendingUpload> = None;
        let received = receive_upload(
            &mut multipart,
            app_state.storage_service.as_ref(),
            app_state.limits.max_file_bytes,
            &mut pending,
        )
        .await;

        if let Err(e) = received {
            if let Some(upload) = pending.take() {
                upload.sink.abort().await;
            }
            return Err(e);
        }

        let upload = pending.ok_or_else(|| {
            warn!("Upload carried no file part");
            ApplicationError::BadRequest(FILE_REQUIRED.to_string())
        })?;

        let size = upload.size;
        let file_id = upload.sink.commit().await?;

        info!(file_id = %file_id, size, "File uploaded");

        Ok(Json(UploadFileResponse { file_id }))
    }

    /// POST /edit
    /// Body: {"fileId": "...", "operations": [...]}
    pub async fn edit_file(
        State(app_state): State<AppState>,
        payload: Result<Json<EditFileRequest>, JsonRejection>,
    ) -> Result<Json<EditFileResponse>, ApplicationError> {
        let Json(body) = payload.map_err(|rejection| {
            if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
                ApplicationError::PayloadTooLarge
            } else {
                warn!("Unreadable edit request: {}", rejection);
                ApplicationError::BadRequest(EDIT_FIELDS_REQUIRED.to_string())
            }
        })?;

        let (raw_id, operations) = match (body.file_id, body.operations) {
            (Some(Value::String(id)), Some(Value::Array(ops))) if !id.is_empty() => (id, ops),
            _ => {
                return Err(ApplicationError::BadRequest(
                    EDIT_FIELDS_REQUIRED.to_string(),
                ))
            }
        };

        let source = FileId::parse(&raw_id).map_err(|e| {
            warn!("Rejected edit source: {}", e);
            source_not_found()
        })?;

        if !app_state.storage_service.exists(&source).await? {
            return Err(source_not_found());
        }

        let operations: Vec<EditOperation> = operations.into_iter().map(EditOperation).collect();
        let document = app_state
            .storage_service
            .read(&source)
            .await
            .map_err(missing_source)?;

        let outcome = app_state
            .document_editor
            .apply(document, &operations)
            .await?;

        let edited_file_id = match outcome {
            EditOutcome::Unchanged => app_state
                .storage_service
                .copy(&source)
                .await
                .map_err(missing_source)?,
            EditOutcome::Rewritten(content) => {
                app_state
                    .storage_service
                    .put(content, Some(DEFAULT_EXTENSION))
                    .await?
            }
        };

        info!(
            source = %source,
            file_id = %edited_file_id,
            operations = operations.len(),
            "File edited"
        );

        Ok(Json(EditFileResponse { edited_file_id }))
    }

    /// GET /download/{file_id}
    pub async fn download_file(
        State(app_state): State<AppState>,
        Path(file_id): Path<String>,
    ) -> Result<Response, ApplicationError> {
        let file_id = FileId::parse(&file_id).map_err(|e| {
            warn!("Rejected download: {}", e);
            ApplicationError::NotFound
        })?;

        let content = app_state.storage_service.read(&file_id).await?;

        info!(file_id = %file_id, size = content.size, "Streaming file");

        Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, PDF_CONTENT_TYPE)
            .header(header::CONTENT_LENGTH, content.size)
            .body(Body::from_stream(ReaderStream::new(content.reader)))
            .map_err(|e| ApplicationError::InternalError(format!("Cannot build response: {}", e)))
    }
}

/// A received file part whose sink has not been committed yet.
struct PendingUpload {
    sink: Box<dyn FileSink>,
    size: usize,
    canonical: bool,
}

/// Streams the preferred file part into the store. Only parts carrying a
/// filename count; `file` wins over its aliases, and a `file` part arriving
/// after an alias replaces it.
async fn receive_upload(
    multipart: &mut Multipart,
    store: &dyn FileStore,
    max_bytes: usize,
    pending: &mut Option<PendingUpload>,
) -> Result<(), ApplicationError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let canonical = match (field.name(), field.file_name()) {
            (Some(FILE_FIELD), Some(_)) => true,
            (Some(name), Some(_)) if FILE_FIELD_ALIASES.contains(&name) => false,
            _ => continue,
        };

        if let Some(current) = pending.as_ref() {
            if current.canonical || !canonical {
                continue;
            }
        }

        let upload = receive_field(field, store, max_bytes, canonical).await?;
        if let Some(replaced) = pending.replace(upload) {
            replaced.sink.abort().await;
        }
    }
    Ok(())
}

async fn receive_field(
    mut field: Field<'_>,
    store: &dyn FileStore,
    max_bytes: usize,
    canonical: bool,
) -> Result<PendingUpload, ApplicationError> {
    let extension = field
        .file_name()
        .and_then(filename_extension)
        .map(str::to_string);
    let mut sink = store.create(extension.as_deref()).await?;

    match copy_field(&mut field, sink.as_mut(), max_bytes).await {
        Ok(size) => Ok(PendingUpload {
            sink,
            size,
            canonical,
        }),
        Err(e) => {
            sink.abort().await;
            Err(e)
        }
    }
}

/// Copies one multipart field into `sink`, refusing anything over `max_bytes`.
async fn copy_field(
    field: &mut Field<'_>,
    sink: &mut dyn FileSink,
    max_bytes: usize,
) -> Result<usize, ApplicationError> {
    let mut size = 0;
    while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
        size += chunk.len();
        if size > max_bytes {
            return Err(ApplicationError::PayloadTooLarge);
        }
        sink.write(&chunk).await?;
    }
    Ok(size)
}

fn multipart_error(error: MultipartError) -> ApplicationError {
    if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApplicationError::PayloadTooLarge
    } else {
        warn!("Invalid multipart data: {}", error);
        ApplicationError::BadRequest(FILE_REQUIRED.to_string())
    }
}

fn source_not_found() -> ApplicationError {
    ApplicationError::ResourceNotFound(FILE_ID_NOT_FOUND.to_string())
}

fn missing_source(error: StorageError) -> ApplicationError {
    match error {
        StorageError::NotFound(_) => source_not_found(),
        other => other.into(),
    }
}
