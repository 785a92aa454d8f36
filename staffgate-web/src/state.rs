//! Gateway application state
//!
//! Built once at startup from configuration; holds only immutable handles.
//! Per-request state (the session) travels in request extensions, so nothing
//! here is shared mutable across concurrent requests.

use std::sync::Arc;

use staffgate_app::{Accounts, Directory, IntegrityGuard, PageDefaults, SessionManager};
use staffgate_core::{Department, Employee, GatewayConfig, SessionRecord, User};
use staffgate_store::{EntityStore, RestEntityStore, StoreClientConfig};

use crate::WebResult;

/// Shared, immutable gateway state.
#[derive(Clone)]
pub struct AppState {
    pub config: GatewayConfig,
    pub sessions: Arc<SessionManager>,
    pub accounts: Arc<Accounts>,
    pub directory: Arc<Directory>,
    pub guard: Arc<IntegrityGuard>,
}

impl AppState {
    /// Wire the state to the remote entity stores named in the configuration.
    pub fn new(config: GatewayConfig) -> WebResult<Self> {
        config.validate().map_err(staffgate_app::AppError::from)?;

        let timeout = config.request_timeout_secs;
        let sessions: Arc<dyn EntityStore<SessionRecord>> = Arc::new(RestEntityStore::new(
            &StoreClientConfig::new(config.stores.sessions.as_str(), timeout),
        )
        .map_err(staffgate_app::AppError::from)?);
        let users: Arc<dyn EntityStore<User>> = Arc::new(RestEntityStore::new(
            &StoreClientConfig::new(config.stores.users.as_str(), timeout),
        )
        .map_err(staffgate_app::AppError::from)?);
        let personnel: Arc<dyn EntityStore<Employee>> = Arc::new(RestEntityStore::new(
            &StoreClientConfig::new(config.stores.personnel.as_str(), timeout),
        )
        .map_err(staffgate_app::AppError::from)?);
        let departments: Arc<dyn EntityStore<Department>> = Arc::new(RestEntityStore::new(
            &StoreClientConfig::new(config.stores.departments.as_str(), timeout),
        )
        .map_err(staffgate_app::AppError::from)?);

        Ok(Self::with_stores(
            config,
            sessions,
            users,
            personnel,
            departments,
        ))
    }

    /// Wire the state to explicit store handles. Tests use this to substitute
    /// in-memory or offline stores.
    pub fn with_stores(
        config: GatewayConfig,
        sessions: Arc<dyn EntityStore<SessionRecord>>,
        users: Arc<dyn EntityStore<User>>,
        personnel: Arc<dyn EntityStore<Employee>>,
        departments: Arc<dyn EntityStore<Department>>,
    ) -> Self {
        let defaults = PageDefaults {
            page: config.default_page,
            per_page: config.default_per_page,
        };

        Self {
            sessions: Arc::new(SessionManager::new(sessions, config.session_ttl_secs)),
            accounts: Arc::new(Accounts::new(users)),
            directory: Arc::new(Directory::new(
                personnel.clone(),
                departments.clone(),
                defaults,
            )),
            guard: Arc::new(IntegrityGuard::new(personnel, departments)),
            config,
        }
    }
}
