use axum::{
    body::Body,
    extract::State,
    http::{Request, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use log::warn;

use crate::state::AppState;

/// The authenticated actor for this request, if any. Anonymous requests
/// carry `None`; each endpoint decides whether that is acceptable.
#[derive(Clone, Debug)]
pub struct CallerIdentity(pub Option<String>);

fn parse_bearer_token(header_value: &str) -> Option<&str> {
    let mut segments = header_value.split_whitespace();

    match (segments.next(), segments.next(), segments.next()) {
        (Some(scheme), Some(token), None) if scheme.eq_ignore_ascii_case("bearer") => {
            if token.is_empty() { None } else { Some(token) }
        }
        _ => None,
    }
}

/// Resolves `Authorization: Bearer` through the account provider and stashes
/// the result as a request extension. Missing or unverifiable credentials
/// degrade to anonymous rather than failing the request here.
pub async fn resolve_caller_identity(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let token = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|raw_header| raw_header.to_str().ok())
        .and_then(parse_bearer_token)
        .map(str::to_owned);

    let identity = match token {
        None => None,
        Some(token) => match state.accounts.resolve_identity(&token).await {
            Ok(identity) => identity,
            Err(err) => {
                warn!("identity resolution failed: {err}");
                None
            }
        },
    };

    req.extensions_mut().insert(CallerIdentity(identity));
    next.run(req).await
}
