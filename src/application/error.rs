use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Unknown resource, answered with a bare status.
    #[error("resource not found")]
    NotFound,

    /// Unknown resource, answered with a JSON error body.
    #[error("{0}")]
    ResourceNotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("payload too large")]
    PayloadTooLarge,

    #[error("internal error: {0}")]
    InternalError(String),
}
