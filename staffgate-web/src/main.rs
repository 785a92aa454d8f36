//! staffgate-web - Gateway binary
//!
//! JSON gateway over the four staffgate entity stores.

use clap::Parser;
use tracing::error;

use staffgate_web::{init_logging, StaffgateServerBuilder, WebConfig};

/// Staffgate gateway server.
#[derive(Parser)]
#[command(name = "staffgate-web")]
#[command(about = "HTTP gateway for the staffgate entity stores")]
#[command(version)]
struct Args {
    /// Server host to bind to
    #[arg(long)]
    host: Option<String>,

    /// Server port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Session store base URL
    #[arg(long)]
    sessions_url: Option<String>,

    /// Users store base URL
    #[arg(long)]
    users_url: Option<String>,

    /// Personnel store base URL
    #[arg(long)]
    personnel_url: Option<String>,

    /// Departments store base URL
    #[arg(long)]
    departments_url: Option<String>,

    /// Sliding session window in seconds
    #[arg(long)]
    session_ttl_secs: Option<i64>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    dotenvy::dotenv().ok();
    init_logging();

    // Environment first, flags override.
    let mut config = WebConfig::from_env();
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(url) = args.sessions_url {
        config.gateway.stores.sessions = url;
    }
    if let Some(url) = args.users_url {
        config.gateway.stores.users = url;
    }
    if let Some(url) = args.personnel_url {
        config.gateway.stores.personnel = url;
    }
    if let Some(url) = args.departments_url {
        config.gateway.stores.departments = url;
    }
    if let Some(ttl) = args.session_ttl_secs {
        config.gateway.session_ttl_secs = ttl;
    }

    let server = match StaffgateServerBuilder::from_config(config).build() {
        Ok(server) => server,
        Err(e) => {
            error!(error = %e, "invalid gateway configuration");
            std::process::exit(1);
        }
    };

    if let Err(e) = server.start().await {
        error!(error = %e, "server error");
        std::process::exit(1);
    }
}
