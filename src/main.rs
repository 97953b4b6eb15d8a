pub mod api;
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod state;

#[cfg(test)]
pub mod test_support;

use axum::http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use tower_http::cors::CorsLayer;
use tracing::{error, info};
use tracing_subscriber::FmtSubscriber;

use crate::api::rest::router::create_router;
use crate::infrastructure::data::db_context::surrealdb_context::init_db;
use crate::infrastructure::telemetry::init_telemetry;
use crate::state::AppState;

#[tokio::main]
async fn main() {
    tracing::subscriber::set_global_default(FmtSubscriber::default()).unwrap();
    init_telemetry();

    if let Err(err) = init_db().await {
        error!(error = %err, "database initialization failed");
        std::process::exit(1);
    }

    let web_origin =
        std::env::var("WEB_ORIGIN").unwrap_or_else(|_| String::from("http://localhost:5173"));
    let cors = CorsLayer::new()
        .allow_origin(web_origin.parse::<HeaderValue>().unwrap())
        .allow_methods([Method::GET, Method::POST])
        .allow_credentials(true)
        .allow_headers([AUTHORIZATION, ACCEPT, CONTENT_TYPE]);

    let state = AppState::init();
    let app = create_router(state).layer(cors);

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| String::from("0.0.0.0:8787"));
    let listener = tokio::net::TcpListener::bind(&bind_addr).await.unwrap();
    info!("pilot gate listening on http://{}", listener.local_addr().unwrap());

    axum::serve(listener, app).await.unwrap();
}
