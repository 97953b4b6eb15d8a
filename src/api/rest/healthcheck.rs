use axum::Json;
use serde_json::{Value, json};

pub async fn health_checker_handler() -> Json<Value> {
    Json(json!({
        "status": "success",
        "message": "Pilot gate is running",
    }))
}
