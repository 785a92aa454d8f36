//! Session Manager
//!
//! Resolves the inbound cookie token against the session store on request
//! entry and persists the (possibly mutated) identity on exit. The session
//! store being unreachable is absorbed here - the request proceeds with an
//! ephemeral, unauthenticated identity and the store is left alone until the
//! next request. Every other store failure propagates.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, warn};
use uuid::Uuid;

use staffgate_core::{NewSession, SessionPatch, SessionRecord, StoreError};
use staffgate_store::EntityStore;

use super::{CookieAction, GatewaySession};
use crate::AppResult;

/// Attempts at generating a non-colliding token before giving up. Collisions
/// of 128-bit random tokens are vanishingly rare; the cap only guards against
/// a store that answers every create with a conflict.
const TOKEN_CREATE_ATTEMPTS: u32 = 4;

/// Per-request session resolution against the remote session store.
pub struct SessionManager {
    store: Arc<dyn EntityStore<SessionRecord>>,
    ttl: Duration,
}

impl SessionManager {
    pub fn new(store: Arc<dyn EntityStore<SessionRecord>>, ttl_secs: i64) -> Self {
        Self {
            store,
            ttl: Duration::seconds(ttl_secs),
        }
    }

    /// Resolve the identity for one request.
    ///
    /// A missing token, an unknown token and an expired record all converge
    /// on a fresh anonymous session; only an unreachable store produces the
    /// ephemeral fallback.
    pub async fn resolve(&self, cookie_token: Option<&str>) -> AppResult<GatewaySession> {
        if let Some(token) = cookie_token {
            match self.store.get(&token.to_string()).await {
                Ok(record) if self.is_live(record.last_used) => {
                    debug!(token, user_id = ?record.user_id, "session resolved");
                    return Ok(GatewaySession::from_record(&record));
                }
                Ok(_) => {
                    debug!(token, "session expired, replacing");
                }
                Err(StoreError::NotFound { .. }) => {
                    debug!(token, "unknown session token, replacing");
                }
                Err(e) if e.is_unreachable() => {
                    warn!(error = %e, "session store unreachable, issuing ephemeral session");
                    return Ok(GatewaySession::ephemeral(generate_token()));
                }
                Err(e) => return Err(e.into()),
            }
        }

        self.create_session().await
    }

    /// Write the session back and tell the HTTP layer what to do with the
    /// cookie. Ephemeral sessions never touch the store or the cookie jar.
    pub async fn persist(&self, session: &GatewaySession) -> AppResult<CookieAction> {
        if session.is_ephemeral() {
            return Ok(CookieAction::None);
        }

        let patch = SessionPatch {
            // last_used always advances (sliding window); user_id only when
            // this request actually changed it.
            user_id: session.is_dirty().then(|| session.user_id()),
            last_used: Utc::now(),
        };

        match self.store.patch(&session.token().to_string(), &patch).await {
            Ok(_) => Ok(CookieAction::Set(session.token().to_string())),
            Err(StoreError::NotFound { .. }) => {
                // The row vanished mid-request; the cookie would never
                // resolve again.
                warn!(token = session.token(), "session row gone, clearing cookie");
                Ok(CookieAction::Clear)
            }
            Err(e) if e.is_unreachable() => {
                warn!(error = %e, "session store unreachable, clearing cookie");
                Ok(CookieAction::Clear)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn create_session(&self) -> AppResult<GatewaySession> {
        for attempt in 1..=TOKEN_CREATE_ATTEMPTS {
            let new = NewSession {
                id: Some(generate_token()),
                user_id: None,
                last_used: Utc::now(),
            };

            match self.store.create(&new).await {
                Ok(record) => {
                    debug!(token = %record.id, "created session");
                    return Ok(GatewaySession::from_record(&record));
                }
                Err(StoreError::Conflict { .. }) => {
                    warn!(attempt, "session token collision, regenerating");
                }
                Err(e) if e.is_unreachable() => {
                    warn!(error = %e, "session store unreachable, issuing ephemeral session");
                    return Ok(GatewaySession::ephemeral(generate_token()));
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(StoreError::unexpected(format!(
            "session store rejected {TOKEN_CREATE_ATTEMPTS} generated tokens in a row"
        ))
        .into())
    }

    fn is_live(&self, last_used: DateTime<Utc>) -> bool {
        last_used + self.ttl > Utc::now()
    }
}

/// 128 bits from the OS entropy pool, rendered as 32 hex chars. Never derived
/// from a prior token.
fn generate_token() -> String {
    Uuid::new_v4().simple().to_string()
}
