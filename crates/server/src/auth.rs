use axum::extract::{Query, Request, State};
use axum::middleware::Next;
use axum::response::Response;
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;

use crate::errors::JsonApiError;
use crate::state::ServerState;

pub const AUTH_COOKIE: &str = "auth_token";

#[derive(Debug, Default, Deserialize)]
struct TokenQuery {
    token: Option<String>,
}

/// Find the caller's token: `Authorization: Bearer`, then the `auth_token`
/// cookie, then `?token=` (browsers cannot set headers on WebSocket upgrades).
fn extract_token(req: &Request, jar: &CookieJar) -> Result<String, JsonApiError> {
    if let Some(h) = req.headers().get(axum::http::header::AUTHORIZATION) {
        let h = h.to_str().map_err(|_| JsonApiError::unauthorized("malformed Authorization header"))?;
        return match h.strip_prefix("Bearer ") {
            Some(t) if !t.trim().is_empty() => Ok(t.trim().to_string()),
            _ => Err(JsonApiError::unauthorized("expected a Bearer token")),
        };
    }
    if let Some(c) = jar.get(AUTH_COOKIE).filter(|c| !c.value().is_empty()) {
        return Ok(c.value().to_string());
    }
    Query::<TokenQuery>::try_from_uri(req.uri())
        .ok()
        .and_then(|q| q.0.token)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| JsonApiError::unauthorized("missing credentials"))
}

/// Verify the token and stash the caller's `Identity` in request extensions.
pub async fn require_identity(
    State(state): State<ServerState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Result<Response, JsonApiError> {
    let path = req.uri().path().to_string();
    let token = extract_token(&req, &jar).inspect_err(|_| {
        tracing::warn!(path = %path, "request without credentials");
    })?;
    let identity = state.tokens.verify(&token).map_err(|e| {
        tracing::warn!(path = %path, err = %e, "token validation failed");
        JsonApiError::from(e)
    })?;
    req.extensions_mut().insert(identity);
    Ok(next.run(req).await)
}
