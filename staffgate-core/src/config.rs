//! Gateway configuration
//!
//! All tunables are passed into components at construction; nothing reads the
//! environment after startup.

use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

/// Base URLs of the four entity-store services.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreEndpoints {
    pub sessions: String,
    pub users: String,
    pub personnel: String,
    pub departments: String,
}

impl Default for StoreEndpoints {
    fn default() -> Self {
        Self {
            sessions: "http://127.0.0.1:5001".to_string(),
            users: "http://127.0.0.1:5002".to_string(),
            personnel: "http://127.0.0.1:5003".to_string(),
            departments: "http://127.0.0.1:5004".to_string(),
        }
    }
}

/// Gateway-wide configuration, initialized once at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Entity-store base URLs.
    pub stores: StoreEndpoints,
    /// Sliding session window, measured from `last_used`.
    pub session_ttl_secs: i64,
    /// Upper bound on every outbound store call.
    pub request_timeout_secs: u64,
    /// Pagination defaults applied when a request names neither.
    pub default_page: u64,
    pub default_per_page: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            stores: StoreEndpoints::default(),
            session_ttl_secs: 3600,
            request_timeout_secs: 5,
            default_page: 1,
            default_per_page: 20,
        }
    }
}

impl GatewayConfig {
    /// Load configuration from `STAFFGATE_*` environment variables, falling
    /// back to defaults for anything unset.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            stores: StoreEndpoints {
                sessions: env_or("STAFFGATE_SESSIONS_URL", &defaults.stores.sessions),
                users: env_or("STAFFGATE_USERS_URL", &defaults.stores.users),
                personnel: env_or("STAFFGATE_PERSONNEL_URL", &defaults.stores.personnel),
                departments: env_or("STAFFGATE_DEPARTMENTS_URL", &defaults.stores.departments),
            },
            session_ttl_secs: env_parse("STAFFGATE_SESSION_TTL_SECS", defaults.session_ttl_secs),
            request_timeout_secs: env_parse(
                "STAFFGATE_REQUEST_TIMEOUT_SECS",
                defaults.request_timeout_secs,
            ),
            default_page: defaults.default_page,
            default_per_page: env_parse("STAFFGATE_PER_PAGE", defaults.default_per_page),
        }
    }

    pub fn validate(&self) -> StoreResult<()> {
        if self.session_ttl_secs <= 0 {
            return Err(StoreError::validation(
                "session_ttl_secs",
                "must be positive",
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(StoreError::validation(
                "request_timeout_secs",
                "must be positive",
            ));
        }
        if self.default_per_page == 0 {
            return Err(StoreError::validation("default_per_page", "must be positive"));
        }
        for (field, url) in [
            ("stores.sessions", &self.stores.sessions),
            ("stores.users", &self.stores.users),
            ("stores.personnel", &self.stores.personnel),
            ("stores.departments", &self.stores.departments),
        ] {
            if url.trim().is_empty() {
                return Err(StoreError::validation(field, "must not be empty"));
            }
        }
        Ok(())
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T: std::str::FromStr + Copy>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
