use axum::{
    Json,
    extract::{Extension, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::api::rest::middleware::CallerIdentity;
use crate::application::services::audit::record_privileged_access;
use crate::application::services::masking::{mask_email, mask_measurement, mask_user_id};
use crate::domain::repositories::StoreError;
use crate::state::AppState;

/// The product tables an audited admin query may touch.
const USER_DATA_TABLES: [&str; 3] = ["workout_plans", "planned_workouts", "body_fat_entries"];

type ApiError = (StatusCode, Json<Value>);

#[derive(Debug, Deserialize)]
pub struct UserDataQuery {
    pub table: String,
    pub target_user_id: Option<String>,
    pub reason: Option<String>,
}

fn require_identity(identity: &CallerIdentity) -> Result<&str, ApiError> {
    identity.0.as_deref().ok_or((
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "status": "fail",
            "message": "Authentication required",
        })),
    ))
}

// Checked before any audit write or data fetch: a denied attempt must leave
// no trace of having touched user data.
fn ensure_admin(state: &AppState, user_id: &str) -> Result<(), ApiError> {
    if state.admin_policy.is_authorized(user_id) {
        Ok(())
    } else {
        Err((
            StatusCode::FORBIDDEN,
            Json(json!({
                "status": "fail",
                "message": "Admin access required",
            })),
        ))
    }
}

fn map_store_error(err: StoreError) -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "status": "error",
            "message": err.to_string(),
        })),
    )
}

/// Pilot enrollment dashboard: code counts plus a masked redemption table.
pub async fn admin_dashboard(
    State(state): State<AppState>,
    Extension(identity): Extension<CallerIdentity>,
) -> Result<Json<Value>, ApiError> {
    let admin_id = require_identity(&identity)?;
    ensure_admin(&state, admin_id)?;

    record_privileged_access(
        state.audit.as_ref(),
        Some(admin_id),
        "view_admin_dashboard",
        None,
        None,
        Some(json!({ "timestamp": Utc::now() })),
        None,
    )
    .await;

    let invites = state.invites.list_all().await.map_err(map_store_error)?;

    let used = invites.iter().filter(|invite| invite.used).count();
    let available = invites.len() - used;

    let rows: Vec<Value> = invites
        .iter()
        .map(|invite| {
            json!({
                "code": invite.code,
                "status": invite.status_label(),
                "used_by": invite.used_by.as_deref().map(mask_user_id),
                "used_at": invite.used_at,
            })
        })
        .collect();

    Ok(Json(json!({
        "status": "success",
        "stats": {
            "used": used,
            "available": available,
            "total": invites.len(),
        },
        "invites": rows,
    })))
}

/// Ad-hoc audited read over a user-data table. The audit entry is written
/// before the fetch; body-fat values are masked in the response so the
/// hidden-vs-absent distinction stays visible without exposing the number.
pub async fn admin_user_data(
    State(state): State<AppState>,
    Extension(identity): Extension<CallerIdentity>,
    Query(params): Query<UserDataQuery>,
) -> Result<Json<Value>, ApiError> {
    let admin_id = require_identity(&identity)?;
    ensure_admin(&state, admin_id)?;

    if !USER_DATA_TABLES.contains(&params.table.as_str()) {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({
                "status": "fail",
                "message": "Unknown user data table",
            })),
        ));
    }

    record_privileged_access(
        state.audit.as_ref(),
        Some(admin_id),
        "view_user_data",
        params.target_user_id.clone(),
        Some(params.table.clone()),
        Some(json!({ "query_time": Utc::now() })),
        params.reason.clone(),
    )
    .await;

    let mut rows = state
        .user_data
        .fetch(&params.table, params.target_user_id.as_deref())
        .await
        .map_err(map_store_error)?;

    for row in rows.iter_mut() {
        scrub_row(&params.table, row);
    }

    Ok(Json(json!({
        "status": "success",
        "results": rows.len(),
        "data": rows,
    })))
}

// PII never leaves this endpoint unmasked: contact fields are always
// scrubbed, and body-fat values keep only their present/absent shape.
fn scrub_row(table: &str, row: &mut Value) {
    let Some(fields) = row.as_object_mut() else {
        return;
    };

    if let Some(email) = fields.get("email").and_then(Value::as_str) {
        let masked = mask_email(email);
        fields.insert(String::from("email"), Value::String(masked));
    }

    if table == "body_fat_entries" {
        if let Some(value) = fields.get("body_fat_percent") {
            let masked = mask_measurement(value.as_f64());
            fields.insert(String::from("body_fat_percent"), Value::String(masked));
        }
    }
}
