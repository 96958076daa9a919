use axum::{
    body::Body,
    extract::Request,
    http::{Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

/// Answers any OPTIONS request that reaches the router with a bare 200,
/// whatever the path and whether or not a route exists for it.
pub async fn answer_options(request: Request<Body>, next: Next) -> Response {
    if request.method() == Method::OPTIONS {
        debug!(path = %request.uri().path(), "Answering OPTIONS request");
        return StatusCode::OK.into_response();
    }

    next.run(request).await
}
