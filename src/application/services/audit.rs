use chrono::Utc;
use metrics::counter;
use serde_json::Value;
use tracing::{info, warn};

use crate::domain::models::audit_entry::NewAuditEntry;
use crate::domain::repositories::AuditStore;

fn sanitize_action(action: &str) -> String {
    action.trim().to_lowercase()
}

/// Records a privileged access in the audit log. Callers await this before
/// issuing the read it accompanies, so the write is ordered ahead of the
/// access; a failed write is surfaced on the `audit` log target and counted,
/// and the guarded operation still proceeds.
///
/// Returns whether an entry was actually persisted. An absent actor is a
/// warning condition, not a writable entry.
pub async fn record_privileged_access(
    store: &dyn AuditStore,
    admin_user_id: Option<&str>,
    action: &str,
    target_user_id: Option<String>,
    table_name: Option<String>,
    details: Option<Value>,
    reason: Option<String>,
) -> bool {
    let action = sanitize_action(action);
    counter!("audit_events_total", 1, "action" => action.clone());

    let Some(admin_user_id) = admin_user_id else {
        counter!("audit_event_errors_total", 1, "action" => action.clone());
        warn!(target: "audit", action = %action, "cannot record audit entry: no authenticated actor");
        return false;
    };

    let entry = NewAuditEntry {
        admin_user_id: admin_user_id.to_owned(),
        action: action.clone(),
        target_user_id,
        table_name,
        details,
        reason,
        created_at: Utc::now(),
    };

    info!(target: "audit", action = %action, admin_user_id = %entry.admin_user_id, "recording privileged access");

    match store.append(entry).await {
        Ok(_) => true,
        Err(err) => {
            counter!("audit_event_errors_total", 1, "action" => action.clone());
            warn!(target: "audit", error = %err, action = %action, "failed to persist audit entry");
            false
        }
    }
}
