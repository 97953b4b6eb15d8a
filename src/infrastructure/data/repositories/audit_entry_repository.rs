use async_trait::async_trait;

use crate::domain::models::audit_entry::{AuditEntry, NewAuditEntry};
use crate::domain::repositories::{AuditStore, StoreError};
use crate::infrastructure::data::db_context::surrealdb_context::DB;

/// Insert and read only. The audit table's tamper-evidence comes from the
/// absence of any update or delete statement here.
pub struct AuditEntryRepository {
    table: String,
}

impl AuditEntryRepository {
    pub fn new() -> Self {
        Self {
            table: String::from("admin_audit_log"),
        }
    }
}

#[async_trait]
impl AuditStore for AuditEntryRepository {
    async fn append(&self, entry: NewAuditEntry) -> Result<AuditEntry, StoreError> {
        let mut response = DB
            .query("CREATE type::table($table) CONTENT $content RETURN AFTER")
            .bind(("table", self.table.clone()))
            .bind(("content", entry))
            .await?;

        if let Some(created) = response.take::<Option<AuditEntry>>(0)? {
            return Ok(created);
        }

        Err(StoreError::Db(String::from("failed to create audit entry")))
    }

    async fn list_for_target(&self, target_user_id: &str) -> Result<Vec<AuditEntry>, StoreError> {
        let mut response = DB
            .query(
                "SELECT * FROM type::table($table) WHERE target_user_id = $target_user_id ORDER BY created_at DESC",
            )
            .bind(("table", self.table.clone()))
            .bind(("target_user_id", target_user_id.to_owned()))
            .await?;

        Ok(response.take::<Vec<AuditEntry>>(0)?)
    }
}
