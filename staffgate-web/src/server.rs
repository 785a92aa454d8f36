//! Staffgate gateway server

use tokio::net::TcpListener;
use tracing::info;

use staffgate_core::StoreEndpoints;

use crate::{create_app, AppState, WebConfig, WebResult};

/// The gateway HTTP server.
pub struct StaffgateServer {
    config: WebConfig,
    state: AppState,
}

impl StaffgateServer {
    pub fn new(config: WebConfig) -> WebResult<Self> {
        let state = AppState::new(config.gateway.clone())?;
        Ok(Self { config, state })
    }

    /// Bind and serve until the process is stopped.
    pub async fn start(self) -> WebResult<()> {
        let address = self.config.address();
        let app = create_app(self.state);

        let listener = TcpListener::bind(&address).await?;
        info!(%address, "staffgate gateway listening");

        axum::serve(listener, app).await?;
        Ok(())
    }

    pub fn config(&self) -> &WebConfig {
        &self.config
    }
}

/// Builder for [`StaffgateServer`].
pub struct StaffgateServerBuilder {
    config: WebConfig,
}

impl StaffgateServerBuilder {
    pub fn new() -> Self {
        Self {
            config: WebConfig::from_env(),
        }
    }

    /// Start from an already assembled configuration instead of the
    /// environment.
    pub fn from_config(config: WebConfig) -> Self {
        Self { config }
    }

    pub fn host<S: Into<String>>(mut self, host: S) -> Self {
        self.config.host = host.into();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    pub fn stores(mut self, endpoints: StoreEndpoints) -> Self {
        self.config.gateway.stores = endpoints;
        self
    }

    pub fn session_ttl_secs(mut self, ttl_secs: i64) -> Self {
        self.config.gateway.session_ttl_secs = ttl_secs;
        self
    }

    pub fn build(self) -> WebResult<StaffgateServer> {
        StaffgateServer::new(self.config)
    }
}

impl Default for StaffgateServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
