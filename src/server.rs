//! HTTP integration: the negotiation gate as an axum route matcher.
//!
//! `negotiate_language` runs the gate on every request of the routes it guards.
//! A request that does not match is answered with `406 Not Acceptable`; a
//! matching request continues with its resolved variables attached as a
//! `RequestVars` extension.

use crate::negotiation::LanguageNegotiator;
use axum::{
    extract::{Request, State},
    http::{header::ACCEPT_LANGUAGE, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Extension, Json, Router,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::debug;

/// Request-scoped variables published by the matcher (e.g. `langneg_lang`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RequestVars(BTreeMap<String, String>);

impl RequestVars {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Middleware that gates a route on language negotiation.
///
/// A non-UTF-8 Accept-Language header is treated as absent.
pub async fn negotiate_language(
    State(negotiator): State<Arc<LanguageNegotiator>>,
    mut request: Request,
    next: Next,
) -> Response {
    let header = request
        .headers()
        .get(ACCEPT_LANGUAGE)
        .and_then(|value| value.to_str().ok());
    let result = negotiator.negotiate(header);

    if !result.matched {
        debug!("Request does not accept any offered language");
        return (StatusCode::NOT_ACCEPTABLE, "No acceptable language available").into_response();
    }

    let mut vars = request
        .extensions_mut()
        .remove::<RequestVars>()
        .unwrap_or_default();
    if let Some(name) = negotiator.variable_name() {
        if !result.value.is_empty() {
            debug!("Setting {} = {}", name, result.value);
            vars.set(name, result.value);
        }
    }
    request.extensions_mut().insert(vars);

    next.run(request).await
}

/// Build the service router.
///
/// `GET /` is guarded by the negotiator and echoes the request variables as
/// JSON; `GET /health` is always reachable.
pub fn router(negotiator: Arc<LanguageNegotiator>) -> Router {
    Router::new()
        .route("/", get(show_vars))
        .route_layer(middleware::from_fn_with_state(negotiator, negotiate_language))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
}

async fn show_vars(Extension(vars): Extension<RequestVars>) -> Json<RequestVars> {
    Json(vars)
}

async fn health() -> &'static str {
    "ok"
}
