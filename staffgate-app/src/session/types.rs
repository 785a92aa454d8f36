//! Session identity types

use staffgate_core::SessionRecord;

/// The identity a request resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Live store-backed session without a user.
    Anonymous,
    /// Live store-backed session with `user_id` set.
    Authenticated,
    /// Created locally because the session store was unreachable; never
    /// persisted, never written to a cookie.
    Ephemeral,
}

/// Per-request mutable session. Mutations raise the dirty flag; the persist
/// step consults it to decide whether `user_id` needs to be written back.
#[derive(Debug, Clone)]
pub struct GatewaySession {
    token: String,
    user_id: Option<i64>,
    ephemeral: bool,
    dirty: bool,
}

impl GatewaySession {
    /// A session resolved from a live store record.
    pub fn from_record(record: &SessionRecord) -> Self {
        Self {
            token: record.id.clone(),
            user_id: record.user_id,
            ephemeral: false,
            dirty: false,
        }
    }

    /// A locally created stand-in for an unreachable session store.
    pub fn ephemeral(token: String) -> Self {
        Self {
            token,
            user_id: None,
            ephemeral: true,
            dirty: false,
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn user_id(&self) -> Option<i64> {
        self.user_id
    }

    pub fn state(&self) -> SessionState {
        if self.ephemeral {
            SessionState::Ephemeral
        } else if self.user_id.is_some() {
            SessionState::Authenticated
        } else {
            SessionState::Anonymous
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.state() == SessionState::Authenticated
    }

    pub fn is_ephemeral(&self) -> bool {
        self.ephemeral
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Bind the session to a user (login).
    pub fn set_user_id(&mut self, user_id: i64) {
        self.user_id = Some(user_id);
        self.dirty = true;
    }

    /// Detach the session from its user (logout). The token itself stays
    /// valid until the session's own expiry.
    pub fn clear_user_id(&mut self) {
        self.user_id = None;
        self.dirty = true;
    }
}

/// What the HTTP layer should do with the `session_id` cookie after the
/// persist step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CookieAction {
    /// Set or refresh the cookie to this token.
    Set(String),
    /// Drop a cookie that will not resolve on the next request.
    Clear,
    /// Leave the cookie jar alone.
    None,
}
