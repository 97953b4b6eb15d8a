use std::sync::Arc;

use crate::application::services::authorization::{AdminPolicy, AllowListPolicy};
use crate::domain::repositories::{AuditStore, InviteStore, UserDataStore};
use crate::infrastructure::accounts::{AccountProvider, HostedAccountsClient};
use crate::infrastructure::data::repositories::audit_entry_repository::AuditEntryRepository;
use crate::infrastructure::data::repositories::invite_repository::InviteRepository;
use crate::infrastructure::data::repositories::user_data_repository::UserDataRepository;

/// Shared wiring handed to every handler. Swapping any collaborator (the
/// allow-list for a real policy store, the hosted provider for another)
/// happens here without touching call sites.
#[derive(Clone)]
pub struct AppState {
    pub invites: Arc<dyn InviteStore>,
    pub audit: Arc<dyn AuditStore>,
    pub user_data: Arc<dyn UserDataStore>,
    pub accounts: Arc<dyn AccountProvider>,
    pub admin_policy: Arc<dyn AdminPolicy>,
}

impl AppState {
    pub fn init() -> Self {
        Self {
            invites: Arc::new(InviteRepository::new()),
            audit: Arc::new(AuditEntryRepository::new()),
            user_data: Arc::new(UserDataRepository::new()),
            accounts: Arc::new(HostedAccountsClient::new()),
            admin_policy: Arc::new(AllowListPolicy::from_env()),
        }
    }

    pub fn new(
        invites: Arc<dyn InviteStore>,
        audit: Arc<dyn AuditStore>,
        user_data: Arc<dyn UserDataStore>,
        accounts: Arc<dyn AccountProvider>,
        admin_policy: Arc<dyn AdminPolicy>,
    ) -> Self {
        Self {
            invites,
            audit,
            user_data,
            accounts,
            admin_policy,
        }
    }
}
