//! Test harness for gateway tests
//!
//! Drives the real router with `tower::ServiceExt::oneshot`, with the entity
//! stores swapped for in-process backends. Store handles stay visible so
//! tests can seed and inspect records directly.

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, COOKIE, SET_COOKIE};
use axum::http::Request;
use axum::response::Response;
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use staffgate_core::{Department, Employee, GatewayConfig, SessionRecord, User};
use staffgate_store::{EntityStore, IdStrategy, MemoryStore};
use staffgate_web::{create_app, AppState};

pub struct TestApp {
    pub app: Router,
    pub sessions: Arc<MemoryStore<SessionRecord>>,
    pub users: Arc<MemoryStore<User>>,
    pub personnel: Arc<MemoryStore<Employee>>,
    pub departments: Arc<MemoryStore<Department>>,
}

impl TestApp {
    /// Gateway over four in-memory stores.
    pub fn new() -> Self {
        let sessions = Arc::new(MemoryStore::<SessionRecord>::new(IdStrategy::Token));
        let users = Arc::new(MemoryStore::<User>::new(IdStrategy::Sequential));
        let personnel = Arc::new(MemoryStore::<Employee>::new(IdStrategy::Sequential));
        let departments = Arc::new(MemoryStore::<Department>::new(IdStrategy::Sequential));

        let app = app_with_stores(
            sessions.clone(),
            users.clone(),
            personnel.clone(),
            departments.clone(),
        );

        Self {
            app,
            sessions,
            users,
            personnel,
            departments,
        }
    }

    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        body: Option<Value>,
        cookie: Option<&str>,
    ) -> Response {
        send_on(&self.app, method, uri, body, cookie).await
    }

    /// Register a user and log in, returning the session token from the
    /// login response cookie.
    pub async fn register_and_login(&self, username: &str, password: &str) -> String {
        let user = serde_json::json!({
            "username": username,
            "firstname": "Test",
            "lastname": "User",
            "email": format!("{username}@x.com"),
            "phone": "555-0100",
            "password": password,
        });
        let response = self.send("POST", "/register", Some(user), None).await;
        assert_eq!(response.status(), 201, "registration failed");

        let login = serde_json::json!({"username": username, "password": password});
        let response = self.send("POST", "/login", Some(login), None).await;
        assert_eq!(response.status(), 200, "login failed");

        session_cookie(&response).expect("login response carried no session cookie")
    }
}

/// Gateway over explicit store handles (offline doubles and the like).
pub fn app_with_stores(
    sessions: Arc<dyn EntityStore<SessionRecord>>,
    users: Arc<dyn EntityStore<User>>,
    personnel: Arc<dyn EntityStore<Employee>>,
    departments: Arc<dyn EntityStore<Department>>,
) -> Router {
    let state = AppState::with_stores(
        GatewayConfig::default(),
        sessions,
        users,
        personnel,
        departments,
    );
    create_app(state)
}

pub async fn send_on(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
    cookie: Option<&str>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = cookie {
        builder = builder.header(COOKIE, format!("session_id={token}"));
    }

    let request = match body {
        Some(value) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .expect("build request"),
        None => builder.body(Body::empty()).expect("build request"),
    };

    app.clone().oneshot(request).await.expect("dispatch request")
}

pub async fn json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("body is JSON")
}

/// The `session_id` value set by the response, if any.
pub fn session_cookie(response: &Response) -> Option<String> {
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|h| h.to_str().ok())
        .find_map(|h| h.strip_prefix("session_id="))
        .map(|rest| rest.split(';').next().unwrap_or_default().to_string())
}
