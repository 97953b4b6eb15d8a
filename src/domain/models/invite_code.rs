use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single-use token gating account creation during the pilot.
///
/// Rows are provisioned out-of-band before launch and mutated exactly once,
/// by the claim in `InviteStore::claim`. `used`, `used_by` and `used_at`
/// always change together; there is no un-redeem operation.
#[allow(non_snake_case)]
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct InviteCode {
    pub code: String,
    pub used: bool,
    pub used_by: Option<String>,
    pub used_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl InviteCode {
    /// `used == false` iff `used_by == None` iff `used_at == None`.
    pub fn is_consistent(&self) -> bool {
        self.used == self.used_by.is_some() && self.used == self.used_at.is_some()
    }

    pub fn status_label(&self) -> &'static str {
        if self.used { "used" } else { "available" }
    }
}
