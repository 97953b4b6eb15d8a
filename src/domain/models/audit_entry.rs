use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Immutable record of a privileged data access. Entries are append-only;
/// no update or delete path exists anywhere in the service.
#[allow(non_snake_case)]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AuditEntry {
    pub id: String,
    pub admin_user_id: String,
    pub action: String,
    pub target_user_id: Option<String>,
    pub table_name: Option<String>,
    pub details: Option<Value>,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Payload for a new entry. `created_at` is stamped by the audit service,
/// never supplied by the HTTP caller.
#[allow(non_snake_case)]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct NewAuditEntry {
    pub admin_user_id: String,
    pub action: String,
    pub target_user_id: Option<String>,
    pub table_name: Option<String>,
    pub details: Option<Value>,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}
