use async_trait::async_trait;

use crate::domain::models::invite_code::InviteCode;
use crate::domain::repositories::{ClaimOutcome, InviteStore, StoreError};
use crate::infrastructure::data::db_context::surrealdb_context::DB;

pub struct InviteRepository {
    table: String,
}

impl InviteRepository {
    pub fn new() -> Self {
        Self {
            table: String::from("pilot_invites"),
        }
    }
}

#[async_trait]
impl InviteStore for InviteRepository {
    async fn lookup(&self, code: &str) -> Result<Option<InviteCode>, StoreError> {
        let mut response = DB
            .query("SELECT * FROM type::table($table) WHERE code = $code LIMIT 1")
            .bind(("table", self.table.clone()))
            .bind(("code", code.to_owned()))
            .await?;

        Ok(response.take::<Option<InviteCode>>(0)?)
    }

    // Single conditional statement: the row is rewritten only if still
    // unused, so concurrent claims on one code settle to exactly one
    // winner. An empty result means the predicate did not match.
    async fn claim(&self, code: &str, claimant: &str) -> Result<ClaimOutcome, StoreError> {
        let mut response = DB
            .query(
                "UPDATE type::table($table) \
                 SET used = true, \
                     used_by = $claimant, \
                     used_at = time::now() \
                 WHERE code = $code AND used = false \
                RETURN AFTER",
            )
            .bind(("table", self.table.clone()))
            .bind(("code", code.to_owned()))
            .bind(("claimant", claimant.to_owned()))
            .await?;

        match response.take::<Option<InviteCode>>(0)? {
            Some(claimed) => Ok(ClaimOutcome::Claimed(claimed)),
            None => Ok(ClaimOutcome::AlreadyClaimed),
        }
    }

    async fn list_all(&self) -> Result<Vec<InviteCode>, StoreError> {
        let mut response = DB
            .query("SELECT * FROM type::table($table) ORDER BY code ASC")
            .bind(("table", self.table.clone()))
            .await?;

        Ok(response.take::<Vec<InviteCode>>(0)?)
    }
}
