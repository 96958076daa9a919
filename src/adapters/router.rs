use axum::{
    extract::DefaultBodyLimit,
    http::{header, Method, StatusCode},
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::adapters::{
    controllers::{file_controller::FileController, health_controller::HealthController},
    middleware::answer_options,
    state::AppState,
};

/// Room for multipart boundaries and part headers on top of the file itself.
const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

pub fn create_router(app_state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let upload_body_limit = app_state
        .limits
        .max_file_bytes
        .saturating_add(MULTIPART_OVERHEAD_BYTES);

    Router::new()
        .route("/healthz", get(HealthController::health_check))
        .route(
            "/upload",
            post(FileController::upload_file).layer(DefaultBodyLimit::max(upload_body_limit)),
        )
        .route("/edit", post(FileController::edit_file))
        .route("/download/{file_id}", get(FileController::download_file))
        .fallback(|| async { StatusCode::NOT_FOUND })
        .layer(middleware::from_fn(answer_options))
        .layer(DefaultBodyLimit::max(app_state.limits.max_json_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
