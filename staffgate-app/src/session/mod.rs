//! Session management
//!
//! Maps an inbound request to a session identity backed by the remote session
//! store, and persists the identity back on the way out.

mod manager;
mod types;

pub use manager::SessionManager;
pub use types::{CookieAction, GatewaySession, SessionState};
