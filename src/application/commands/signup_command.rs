use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::error;

use crate::application::services::signup::{SignupError, SignupFlow, SignupOutcome};
use crate::infrastructure::accounts::AccountsError;
use crate::state::AppState;

type ApiError = (StatusCode, Json<Value>);

#[derive(Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub invite_code: String,
}

pub async fn signup_command(
    State(state): State<AppState>,
    Json(body): Json<SignupRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let flow = SignupFlow::new(state.invites.clone(), state.accounts.clone());

    let outcome = flow
        .run(&body.email, &body.password, &body.invite_code)
        .await
        .map_err(error_response)?;

    let json_response = match outcome {
        SignupOutcome::Enrolled { account_id } => json!({
            "status": "success",
            "account_id": account_id,
            "session_issued": true,
        }),
        SignupOutcome::ConfirmationPending { account_id } => json!({
            "status": "success",
            "account_id": account_id,
            "session_issued": false,
            "message": "Check your email to confirm your account, then sign in.",
        }),
    };

    Ok((StatusCode::CREATED, Json(json_response)))
}

fn error_response(err: SignupError) -> ApiError {
    let (status, level, message) = match &err {
        SignupError::Validation(message) => {
            (StatusCode::BAD_REQUEST, "fail", (*message).to_string())
        }
        SignupError::NotFoundOrUsed => (StatusCode::BAD_REQUEST, "fail", err.to_string()),
        SignupError::ClaimRaceLost => (StatusCode::CONFLICT, "fail", err.to_string()),
        SignupError::AccountProvider(AccountsError::Rejected(message)) => {
            (StatusCode::UNPROCESSABLE_ENTITY, "fail", message.clone())
        }
        SignupError::AccountProvider(_) => (
            StatusCode::BAD_GATEWAY,
            "error",
            String::from("Account service is unavailable. Please try again."),
        ),
        SignupError::Store(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "error",
            String::from("Something went wrong. Please try again."),
        ),
    };

    // The generic messages above are what the user sees; the specific
    // failure goes to the log.
    if status.is_server_error() {
        error!(error = %err, "signup attempt failed");
    }

    (
        status,
        Json(json!({
            "status": level,
            "message": message,
        })),
    )
}
