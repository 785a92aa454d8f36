//! Session middleware
//!
//! Wraps every route: read the `session_id` cookie, resolve it through the
//! Session Manager, expose the session to handlers via request extensions,
//! then persist it and settle the cookie on the response. Each request gets
//! its own cell; nothing is shared between concurrent requests.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header::{HeaderMap, HeaderValue, COOKIE, SET_COOKIE};
use axum::middleware::Next;
use axum::response::Response;
use tokio::sync::Mutex;
use tracing::warn;

use staffgate_app::{AppError, CookieAction, GatewaySession};

use crate::{AppState, WebError, WebResult};

pub const SESSION_COOKIE: &str = "session_id";

/// Per-request handle on the resolved session. Handlers mutate it (login,
/// logout); the middleware reads it back for the persist step.
#[derive(Clone)]
pub struct SessionCell(Arc<Mutex<GatewaySession>>);

impl SessionCell {
    fn new(session: GatewaySession) -> Self {
        Self(Arc::new(Mutex::new(session)))
    }

    pub async fn user_id(&self) -> Option<i64> {
        self.0.lock().await.user_id()
    }

    /// The authenticated user, or a 401 for anonymous and ephemeral sessions.
    pub async fn require_user(&self) -> WebResult<i64> {
        self.user_id()
            .await
            .ok_or_else(|| WebError::from(AppError::unauthorized("login required")))
    }

    pub async fn login(&self, user_id: i64) {
        self.0.lock().await.set_user_id(user_id);
    }

    pub async fn logout(&self) {
        self.0.lock().await.clear_user_id();
    }

    async fn snapshot(&self) -> GatewaySession {
        self.0.lock().await.clone()
    }
}

/// Resolve on entry, persist on exit.
pub async fn session_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> WebResult<Response> {
    let token = cookie_value(request.headers(), SESSION_COOKIE);
    let session = state.sessions.resolve(token.as_deref()).await?;

    let cell = SessionCell::new(session);
    request.extensions_mut().insert(cell.clone());

    let mut response = next.run(request).await;

    let session = cell.snapshot().await;
    match state.sessions.persist(&session).await? {
        CookieAction::Set(token) => {
            set_cookie(&mut response, &format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly"));
        }
        CookieAction::Clear => {
            set_cookie(&mut response, &format!("{SESSION_COOKIE}=; Path=/; Max-Age=0"));
        }
        CookieAction::None => {}
    }

    Ok(response)
}

fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    let raw = headers.get(COOKIE)?.to_str().ok()?;
    let prefix = format!("{name}=");
    raw.split(';')
        .map(str::trim)
        .find_map(|cookie| cookie.strip_prefix(prefix.as_str()))
        .map(str::to_string)
}

fn set_cookie(response: &mut Response, value: &str) {
    match HeaderValue::from_str(value) {
        Ok(header) => {
            response.headers_mut().append(SET_COOKIE, header);
        }
        Err(e) => warn!(error = %e, "dropping unencodable session cookie"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cookie_value_finds_the_session_token() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; session_id=cafe1234; lang=en"),
        );
        assert_eq!(
            cookie_value(&headers, SESSION_COOKIE),
            Some("cafe1234".to_string())
        );
        assert_eq!(cookie_value(&headers, "missing"), None);
        assert_eq!(cookie_value(&HeaderMap::new(), SESSION_COOKIE), None);
    }
}
