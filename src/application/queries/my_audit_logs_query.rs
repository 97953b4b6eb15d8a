use axum::{
    Json,
    extract::{Extension, State},
    http::StatusCode,
};
use serde_json::{Value, json};

use crate::api::rest::middleware::CallerIdentity;
use crate::state::AppState;

type ApiError = (StatusCode, Json<Value>);

/// Self-service transparency: a signed-in user can see every audit entry
/// that names them as the target of a privileged read.
pub async fn my_audit_logs_query(
    State(state): State<AppState>,
    Extension(identity): Extension<CallerIdentity>,
) -> Result<Json<Value>, ApiError> {
    let Some(user_id) = identity.0.as_deref() else {
        return Err((
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "status": "fail",
                "message": "Authentication required",
            })),
        ));
    };

    let entries = state.audit.list_for_target(user_id).await.map_err(|err| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "status": "error",
                "message": err.to_string(),
            })),
        )
    })?;

    Ok(Json(json!({
        "status": "success",
        "results": entries.len(),
        "data": entries,
    })))
}
