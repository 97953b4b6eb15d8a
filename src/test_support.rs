//! In-memory collaborators for tests. The invite store reproduces the
//! database's conditional-update semantics under a lock, so claim races can
//! be exercised without a live SurrealDB.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use tokio::sync::Barrier;

use crate::application::services::authorization::AllowListPolicy;
use crate::domain::models::audit_entry::{AuditEntry, NewAuditEntry};
use crate::domain::models::invite_code::InviteCode;
use crate::domain::repositories::{
    AuditStore, ClaimOutcome, InviteStore, StoreError, UserDataStore,
};
use crate::infrastructure::accounts::{AccountProvider, AccountsError, CreatedAccount};
use crate::state::AppState;

pub struct MemoryInviteStore {
    rows: Mutex<HashMap<String, InviteCode>>,
    list_calls: AtomicUsize,
}

impl MemoryInviteStore {
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(HashMap::new()),
            list_calls: AtomicUsize::new(0),
        }
    }

    pub fn seeded(codes: &[&str]) -> Self {
        let store = Self::new();
        store.seed(codes);
        store
    }

    pub fn seed(&self, codes: &[&str]) {
        let mut rows = self.rows.lock().expect("invite store lock");
        for code in codes {
            rows.insert(
                (*code).to_owned(),
                InviteCode {
                    code: (*code).to_owned(),
                    used: false,
                    used_by: None,
                    used_at: None,
                    created_at: Utc::now(),
                },
            );
        }
    }

    /// Marks a seeded row redeemed without going through the claim path,
    /// for arranging dashboard fixtures.
    pub fn force_claim(&self, code: &str, claimant: &str) {
        let mut rows = self.rows.lock().expect("invite store lock");
        let invite = rows.get_mut(code).expect("code must be seeded first");
        invite.used = true;
        invite.used_by = Some(claimant.to_owned());
        invite.used_at = Some(Utc::now());
    }

    pub fn snapshot(&self, code: &str) -> Option<InviteCode> {
        self.rows.lock().expect("invite store lock").get(code).cloned()
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl InviteStore for MemoryInviteStore {
    async fn lookup(&self, code: &str) -> Result<Option<InviteCode>, StoreError> {
        Ok(self.rows.lock().expect("invite store lock").get(code).cloned())
    }

    async fn claim(&self, code: &str, claimant: &str) -> Result<ClaimOutcome, StoreError> {
        let mut rows = self.rows.lock().expect("invite store lock");
        match rows.get_mut(code) {
            Some(invite) if !invite.used => {
                invite.used = true;
                invite.used_by = Some(claimant.to_owned());
                invite.used_at = Some(Utc::now());
                Ok(ClaimOutcome::Claimed(invite.clone()))
            }
            _ => Ok(ClaimOutcome::AlreadyClaimed),
        }
    }

    async fn list_all(&self) -> Result<Vec<InviteCode>, StoreError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let mut invites: Vec<InviteCode> = self
            .rows
            .lock()
            .expect("invite store lock")
            .values()
            .cloned()
            .collect();
        invites.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(invites)
    }
}

pub struct MemoryAuditStore {
    entries: Mutex<Vec<AuditEntry>>,
    next_id: AtomicUsize,
}

impl MemoryAuditStore {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            next_id: AtomicUsize::new(1),
        }
    }

    pub fn entries(&self) -> Vec<AuditEntry> {
        self.entries.lock().expect("audit store lock").clone()
    }
}

#[async_trait]
impl AuditStore for MemoryAuditStore {
    async fn append(&self, entry: NewAuditEntry) -> Result<AuditEntry, StoreError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let entry = AuditEntry {
            id: format!("admin_audit_log:{id}"),
            admin_user_id: entry.admin_user_id,
            action: entry.action,
            target_user_id: entry.target_user_id,
            table_name: entry.table_name,
            details: entry.details,
            reason: entry.reason,
            created_at: entry.created_at,
        };
        self.entries
            .lock()
            .expect("audit store lock")
            .push(entry.clone());
        Ok(entry)
    }

    async fn list_for_target(&self, target_user_id: &str) -> Result<Vec<AuditEntry>, StoreError> {
        let mut matches: Vec<AuditEntry> = self
            .entries
            .lock()
            .expect("audit store lock")
            .iter()
            .filter(|entry| entry.target_user_id.as_deref() == Some(target_user_id))
            .cloned()
            .collect();
        matches.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matches)
    }
}

/// Every write fails, for exercising the log-and-proceed policy.
pub struct FailingAuditStore;

#[async_trait]
impl AuditStore for FailingAuditStore {
    async fn append(&self, _entry: NewAuditEntry) -> Result<AuditEntry, StoreError> {
        Err(StoreError::Db(String::from("injected audit failure")))
    }

    async fn list_for_target(&self, _target_user_id: &str) -> Result<Vec<AuditEntry>, StoreError> {
        Err(StoreError::Db(String::from("injected audit failure")))
    }
}

pub struct MemoryUserDataStore {
    tables: Mutex<HashMap<String, Vec<Value>>>,
}

impl MemoryUserDataStore {
    pub fn new() -> Self {
        Self {
            tables: Mutex::new(HashMap::new()),
        }
    }

    pub fn insert(&self, table: &str, rows: Vec<Value>) {
        self.tables
            .lock()
            .expect("user data lock")
            .insert(table.to_owned(), rows);
    }
}

#[async_trait]
impl UserDataStore for MemoryUserDataStore {
    async fn fetch(
        &self,
        table: &str,
        target_user_id: Option<&str>,
    ) -> Result<Vec<Value>, StoreError> {
        let tables = self.tables.lock().expect("user data lock");
        let rows = tables.get(table).cloned().unwrap_or_default();
        Ok(rows
            .into_iter()
            .filter(|row| match target_user_id {
                Some(user_id) => row.get("user_id").and_then(Value::as_str) == Some(user_id),
                None => true,
            })
            .collect())
    }
}

pub struct StubAccountProvider {
    session_issued: bool,
    failure: Option<String>,
    gate: Option<Arc<Barrier>>,
    created: Mutex<Vec<String>>,
    next_id: AtomicUsize,
}

impl StubAccountProvider {
    pub fn new() -> Self {
        Self {
            session_issued: true,
            failure: None,
            gate: None,
            created: Mutex::new(Vec::new()),
            next_id: AtomicUsize::new(1),
        }
    }

    pub fn without_session() -> Self {
        Self {
            session_issued: false,
            ..Self::new()
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(String::from(message)),
            ..Self::new()
        }
    }

    /// Blocks each `create_account` call on the barrier, so concurrent
    /// signup flows all pass the pre-check before any of them claims.
    pub fn gated(gate: Arc<Barrier>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::new()
        }
    }

    pub fn created_accounts(&self) -> usize {
        self.created.lock().expect("provider lock").len()
    }
}

#[async_trait]
impl AccountProvider for StubAccountProvider {
    async fn create_account(
        &self,
        email: &str,
        _password: &str,
    ) -> Result<CreatedAccount, AccountsError> {
        if let Some(message) = &self.failure {
            return Err(AccountsError::Rejected(message.clone()));
        }

        if let Some(gate) = &self.gate {
            gate.wait().await;
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.created
            .lock()
            .expect("provider lock")
            .push(email.to_owned());

        Ok(CreatedAccount {
            account_id: format!("acct-{id}"),
            session_issued: self.session_issued,
        })
    }

    async fn resolve_identity(&self, token: &str) -> Result<Option<String>, AccountsError> {
        // Tests pass the user id directly as the bearer token.
        Ok(Some(token.to_owned()))
    }
}

pub struct TestHarness {
    pub invites: Arc<MemoryInviteStore>,
    pub audit: Arc<MemoryAuditStore>,
    pub user_data: Arc<MemoryUserDataStore>,
    pub accounts: Arc<StubAccountProvider>,
    pub state: AppState,
}

pub fn harness_with_admins(admins: &[&str]) -> TestHarness {
    let invites = Arc::new(MemoryInviteStore::new());
    let audit = Arc::new(MemoryAuditStore::new());
    let user_data = Arc::new(MemoryUserDataStore::new());
    let accounts = Arc::new(StubAccountProvider::new());
    let policy = AllowListPolicy::new(admins.iter().map(|admin| (*admin).to_owned()));

    let state = AppState::new(
        invites.clone(),
        audit.clone(),
        user_data.clone(),
        accounts.clone(),
        Arc::new(policy),
    );

    TestHarness {
        invites,
        audit,
        user_data,
        accounts,
        state,
    }
}
