use std::sync::Arc;

use metrics::counter;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::repositories::{ClaimOutcome, InviteStore, StoreError};
use crate::infrastructure::accounts::{AccountProvider, AccountsError};

const MIN_PASSWORD_LENGTH: usize = 6;

/// Stages of one signup attempt, traversed strictly in order. The only
/// cross-request contention is two attempts racing on the claim for the
/// same code, which the store's conditional update settles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SignupStage {
    Idle,
    CodeValidating,
    AccountCreating,
    CodeClaiming,
}

impl SignupStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignupStage::Idle => "idle",
            SignupStage::CodeValidating => "code_validating",
            SignupStage::AccountCreating => "account_creating",
            SignupStage::CodeClaiming => "code_claiming",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SignupOutcome {
    /// Account created, code claimed, session live.
    Enrolled { account_id: String },
    /// Account created and code claimed, but the provider wants an
    /// out-of-band confirmation before issuing a session.
    ConfirmationPending { account_id: String },
}

#[derive(Debug, Error)]
pub enum SignupError {
    #[error("{0}")]
    Validation(&'static str),

    /// Unknown and already-used codes share one message so the gate does
    /// not reveal which codes exist.
    #[error("Invalid or already used invite code. Contact admin if you think this is an error.")]
    NotFoundOrUsed,

    #[error("This invite code was just claimed by another user. Please try a different code.")]
    ClaimRaceLost,

    #[error(transparent)]
    AccountProvider(#[from] AccountsError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Uppercases and trims a submitted code. Codes are distributed in the
/// `PILOT-KB-##` shape but arrive hand-typed.
pub fn normalize_code(raw: &str) -> Result<String, SignupError> {
    let code = raw.trim().to_uppercase();
    if code.is_empty() {
        return Err(SignupError::Validation("An invite code is required"));
    }
    Ok(code)
}

pub struct SignupFlow {
    invites: Arc<dyn InviteStore>,
    accounts: Arc<dyn AccountProvider>,
}

impl SignupFlow {
    pub fn new(invites: Arc<dyn InviteStore>, accounts: Arc<dyn AccountProvider>) -> Self {
        Self { invites, accounts }
    }

    /// Runs one signup attempt to a terminal state.
    ///
    /// The pre-check lookup is advisory, for a fast failure before the cost
    /// of account creation; the conditional claim afterwards is the
    /// correctness mechanism. If the claim loses the race the account from
    /// the middle step stays behind unclaimed, waiting on manual cleanup by
    /// an administrator.
    pub async fn run(
        &self,
        email: &str,
        password: &str,
        raw_code: &str,
    ) -> Result<SignupOutcome, SignupError> {
        debug!(stage = SignupStage::Idle.as_str(), "starting signup attempt");

        debug!(stage = SignupStage::CodeValidating.as_str(), "advancing signup");
        let email = email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(SignupError::Validation("A valid email address is required"));
        }
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(SignupError::Validation(
                "Password must be at least 6 characters long",
            ));
        }
        let code = normalize_code(raw_code)?;

        match self.invites.lookup(&code).await? {
            Some(invite) if !invite.used => {}
            _ => {
                counter!("invite_claims_total", 1, "outcome" => "rejected_precheck");
                return Err(SignupError::NotFoundOrUsed);
            }
        }

        debug!(stage = SignupStage::AccountCreating.as_str(), "advancing signup");
        let account = self.accounts.create_account(email, password).await?;

        debug!(stage = SignupStage::CodeClaiming.as_str(), "advancing signup");
        match self.invites.claim(&code, &account.account_id).await? {
            ClaimOutcome::Claimed(invite) => {
                counter!("invite_claims_total", 1, "outcome" => "claimed");
                info!(code = %invite.code, account_id = %account.account_id, "invite code claimed");
            }
            ClaimOutcome::AlreadyClaimed => {
                counter!("invite_claims_total", 1, "outcome" => "race_lost");
                warn!(
                    code = %code,
                    account_id = %account.account_id,
                    "claim lost the race; account left unclaimed pending manual cleanup"
                );
                return Err(SignupError::ClaimRaceLost);
            }
        }

        if account.session_issued {
            Ok(SignupOutcome::Enrolled {
                account_id: account.account_id,
            })
        } else {
            Ok(SignupOutcome::ConfirmationPending {
                account_id: account.account_id,
            })
        }
    }
}
