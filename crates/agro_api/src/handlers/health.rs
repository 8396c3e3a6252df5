use axum::Json;
use serde_json::{json, Value};

/// GET /health
pub(crate) async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": agro_core::core_version(),
    }))
}
