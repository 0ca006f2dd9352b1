use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::backend::Query;
use crate::AppState;

pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let probe = Query::table("events").select("id").limit(1);
    let backend_ok = state
        .backend
        .select::<serde_json::Value>(&probe)
        .await
        .is_ok();

    if backend_ok {
        (StatusCode::OK, Json(json!({ "status": "healthy" })))
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "unhealthy", "backend": "unreachable" })),
        )
    }
}
