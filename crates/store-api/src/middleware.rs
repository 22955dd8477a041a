//! # Access-Gate Middleware
//!
//! Runs the access gate ahead of every route. Decisions come from
//! `store_core::access`; this layer only translates them into HTTP:
//! `Allow` passes the request through, `Redirect` becomes a 303. The gate
//! never produces an error response.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use store_core::GateDecision;
use tracing::debug;

use crate::state::AppState;

/// Pull the bearer token out of the Authorization header, if any
pub fn bearer_token(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

/// Gate every navigation; protected prefixes redirect on any trust failure.
pub async fn access_gate(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    let token = bearer_token(&request);

    match state.gate.evaluate(&path, token) {
        GateDecision::Allow => next.run(request).await,
        GateDecision::Redirect(target) => {
            debug!("Gate redirect: {} -> {}", path, target);
            Redirect::to(&target).into_response()
        }
    }
}
