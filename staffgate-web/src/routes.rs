//! Route definitions for the staffgate gateway

use axum::routing::{get, post};
use axum::Router;

use crate::{handlers, AppState};

/// All gateway routes. The session middleware is layered on by
/// [`crate::create_app`].
pub fn gateway_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        // Accounts
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .route("/logout", post(handlers::logout))
        .route("/me", get(handlers::me))
        // Personnel
        .route(
            "/personnel",
            get(handlers::list_personnel).post(handlers::create_employee),
        )
        .route(
            "/personnel/{id}",
            get(handlers::show_employee).delete(handlers::delete_employee),
        )
        // Departments
        .route(
            "/departments",
            get(handlers::list_departments).post(handlers::create_department),
        )
        .route(
            "/departments/{id}",
            get(handlers::show_department).delete(handlers::delete_department),
        )
}
