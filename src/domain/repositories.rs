use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::domain::models::audit_entry::{AuditEntry, NewAuditEntry};
use crate::domain::models::invite_code::InviteCode;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Db(String),
}

impl From<surrealdb::Error> for StoreError {
    fn from(err: surrealdb::Error) -> Self {
        StoreError::Db(err.to_string())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ClaimOutcome {
    Claimed(InviteCode),
    /// The code is unknown or already redeemed. The registry does not say
    /// which, so callers cannot probe for codes that exist.
    AlreadyClaimed,
}

/// Storage contract for the invite registry. `claim` is the only write path
/// to `used`/`used_by`/`used_at` in the whole service.
#[async_trait]
pub trait InviteStore: Send + Sync {
    /// Case-sensitive exact match on the natural key.
    async fn lookup(&self, code: &str) -> Result<Option<InviteCode>, StoreError>;

    /// Marks the code redeemed by `claimant`. Must be a single conditional
    /// update ("set used WHERE code and NOT used"): under concurrent calls
    /// for one code, at most one caller ever sees `Claimed`.
    async fn claim(&self, code: &str, claimant: &str) -> Result<ClaimOutcome, StoreError>;

    /// Full table, ordered by code ascending.
    async fn list_all(&self) -> Result<Vec<InviteCode>, StoreError>;
}

/// Append-only storage contract for the audit log.
#[async_trait]
pub trait AuditStore: Send + Sync {
    async fn append(&self, entry: NewAuditEntry) -> Result<AuditEntry, StoreError>;

    /// Entries naming `target_user_id`, newest first. A user with no
    /// entries gets an empty list, not an error.
    async fn list_for_target(&self, target_user_id: &str) -> Result<Vec<AuditEntry>, StoreError>;
}

/// Read access to the product's user-data tables for audited admin queries.
#[async_trait]
pub trait UserDataStore: Send + Sync {
    async fn fetch(
        &self,
        table: &str,
        target_user_id: Option<&str>,
    ) -> Result<Vec<Value>, StoreError>;
}
