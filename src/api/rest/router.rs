use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::api::rest::admin::{admin_dashboard, admin_user_data};
use crate::api::rest::healthcheck::health_checker_handler;
use crate::api::rest::middleware::resolve_caller_identity;
use crate::application::commands::signup_command::signup_command;
use crate::application::queries::my_audit_logs_query::my_audit_logs_query;
use crate::infrastructure::telemetry::metrics_handler;
use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    let api_router = Router::new()
        .route("/healthcheck/", get(health_checker_handler))
        .route("/signup/", post(signup_command))
        .route("/audit/me/", get(my_audit_logs_query))
        .route("/admin/dashboard/", get(admin_dashboard))
        .route("/admin/user-data/", get(admin_user_data))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            resolve_caller_identity,
        ));

    Router::new()
        .nest("/api", api_router)
        .route("/metrics", get(metrics_handler))
        .with_state(state)
}
