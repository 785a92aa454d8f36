//! staffgate-stored - Entity-store service
//!
//! Serves one record collection per process over the store REST surface,
//! backed by an in-memory paginated record store.

use clap::Parser;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use staffgate_core::{init_logging, Department, Employee, SessionRecord, User};
use staffgate_store::{service, IdStrategy, MemoryStore};

/// Staffgate entity-store service.
#[derive(Parser)]
#[command(name = "staffgate-stored")]
#[command(about = "Single-collection record store for the staffgate gateway")]
#[command(version)]
struct Args {
    /// Collection to serve: users, personnel, departments or sessions
    #[arg(long)]
    collection: String,

    /// Host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on
    #[arg(short, long)]
    port: u16,

    /// Default page size for list responses
    #[arg(long, default_value = "20")]
    per_page: u64,
}

fn router_for(collection: &str, per_page: u64) -> Option<axum::Router> {
    let router = match collection {
        "users" => service::collection_router(
            MemoryStore::<User>::new(IdStrategy::Sequential).with_per_page(per_page),
        ),
        "personnel" => service::collection_router(
            MemoryStore::<Employee>::new(IdStrategy::Sequential).with_per_page(per_page),
        ),
        "departments" => service::collection_router(
            MemoryStore::<Department>::new(IdStrategy::Sequential).with_per_page(per_page),
        ),
        "sessions" => service::collection_router(
            MemoryStore::<SessionRecord>::new(IdStrategy::Token).with_per_page(per_page),
        ),
        _ => return None,
    };
    Some(router)
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    dotenvy::dotenv().ok();
    init_logging("staffgate_store=debug,tower_http=info");

    let Some(app) = router_for(&args.collection, args.per_page) else {
        error!(
            collection = %args.collection,
            "unknown collection; expected users, personnel, departments or sessions"
        );
        std::process::exit(1);
    };
    let app = app.layer(TraceLayer::new_for_http());

    let address = format!("{}:{}", args.host, args.port);
    let listener = match tokio::net::TcpListener::bind(&address).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(%address, error = %e, "failed to bind");
            std::process::exit(1);
        }
    };

    info!(collection = %args.collection, %address, "entity store listening");

    if let Err(e) = axum::serve(listener, app).await {
        error!(error = %e, "server error");
        std::process::exit(1);
    }
}
