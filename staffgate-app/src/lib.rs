//! Staffgate Applications - Cross-store orchestration
//!
//! The gateway's workflow layer, sitting between the entity-store clients and
//! the HTTP surface:
//!
//! - **Session management**: per-request identity against the remote session
//!   store, with ephemeral degraded mode when that store is down
//! - **Referential integrity**: best-effort check-then-act enforcement of the
//!   department/personnel link on delete
//! - **Accounts and directory workflows**: the user-facing compositions of
//!   the four stores, substituting placeholders where a secondary store is
//!   unreachable
//!
//! Nothing here keeps in-process state across requests; every component is a
//! thin orchestrator over `Arc<dyn EntityStore<_>>` handles and is safe under
//! concurrent invocation.

pub mod accounts;
pub mod directory;
pub mod guard;
pub mod session;

pub use accounts::Accounts;
pub use directory::{DepartmentDetail, Directory, EmployeeDetail, PageDefaults};
pub use guard::IntegrityGuard;
pub use session::{CookieAction, GatewaySession, SessionManager, SessionState};

use staffgate_core::StoreError;

/// Application-level error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Credential failure or anonymous access to a protected workflow.
    #[error("unauthorized: {message}")]
    Unauthorized { message: String },

    /// Referential-integrity refusal (distinct from a store-level conflict).
    #[error("conflict: {message}")]
    Conflict { message: String },
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn unauthorized<S: Into<String>>(message: S) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    pub fn conflict<S: Into<String>>(message: S) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }
}
