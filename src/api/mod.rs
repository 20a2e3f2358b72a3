//! HTTP surface of the orchestration tier: login, balance and transfer
//! operations over JSON, with bearer-token sessions.

pub mod dto;
pub mod errors;
pub mod routes;

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{HeaderMap, header};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;

use crate::application::BankService;

pub type SharedService = Arc<BankService>;

/// Authenticated principal, injected by the auth middleware.
#[derive(Debug, Clone)]
pub struct Principal(pub String);

/// Build the full router. `/health` and `/login` are open; everything else
/// requires a valid session token.
pub fn build_app(service: SharedService) -> Router {
    let protected = Router::new()
        .route("/balance", get(routes::get_balance))
        .route(
            "/transfers",
            post(routes::submit_transfer).get(routes::list_transfers),
        )
        .route("/transfers/:id", get(routes::get_transfer_status))
        .route("/audit", get(routes::audit_trail))
        .layer(middleware::from_fn_with_state(
            service.clone(),
            require_session,
        ));

    Router::new()
        .route("/health", get(routes::health))
        .route("/login", post(routes::login))
        .merge(protected)
        .with_state(service)
}

async fn require_session(
    State(service): State<SharedService>,
    mut req: Request,
    next: Next,
) -> Response {
    let Some(token) = bearer_token(req.headers()) else {
        return errors::unauthorized();
    };

    match service.authenticate(token).await {
        Ok(principal) => {
            req.extensions_mut().insert(Principal(principal));
            next.run(req).await
        }
        Err(_) => errors::unauthorized(),
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let header = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?.trim();
    if token.is_empty() { None } else { Some(token) }
}
