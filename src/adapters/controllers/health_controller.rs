use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
}

pub struct HealthController;

impl HealthController {
    /// Liveness probe. Never touches the file store.
    /// GET /healthz
    pub async fn health_check() -> Json<HealthResponse> {
        Json(HealthResponse { ok: true })
    }
}
