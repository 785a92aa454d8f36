//! Degraded-mode behavior when individual stores are down.

mod helpers;

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;

use helpers::{app_with_stores, json_body, send_on, session_cookie, TestApp};
use staffgate_core::{Department, Employee, NewSession, SessionRecord, User};
use staffgate_store::{EntityStore, IdStrategy, MemoryStore, OfflineStore};

#[tokio::test]
async fn unreachable_session_store_leaves_no_cookie() {
    let base = TestApp::new();
    let app = app_with_stores(
        Arc::new(OfflineStore::<SessionRecord>::new()),
        base.users.clone(),
        base.personnel.clone(),
        base.departments.clone(),
    );

    // Public routes still work, but the response carries no session cookie.
    let response = send_on(&app, "GET", "/personnel", None, None).await;
    assert_eq!(response.status(), 200);
    assert_eq!(session_cookie(&response), None);

    // A stale cookie is not echoed back either.
    let response = send_on(&app, "GET", "/", None, Some("cafe1234")).await;
    assert_eq!(response.status(), 200);
    assert_eq!(session_cookie(&response), None);
    let body = json_body(response).await;
    assert_eq!(body["authenticated"], false);

    // Protected routes degrade to unauthenticated.
    let response = send_on(&app, "GET", "/me", None, Some("cafe1234")).await;
    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn login_on_an_ephemeral_session_does_not_outlive_the_request() {
    let base = TestApp::new();
    let app = app_with_stores(
        Arc::new(OfflineStore::<SessionRecord>::new()),
        base.users.clone(),
        base.personnel.clone(),
        base.departments.clone(),
    );

    let user = json!({
        "username": "ada", "firstname": "Ada", "lastname": "L",
        "email": "ada@x.com", "phone": "1", "password": "pw"
    });
    let response = send_on(&app, "POST", "/register", Some(user), None).await;
    assert_eq!(response.status(), 201);

    // Credentials are accepted, but the identity cannot be persisted: no
    // cookie comes back.
    let login = json!({"username": "ada", "password": "pw"});
    let response = send_on(&app, "POST", "/login", Some(login), None).await;
    assert_eq!(response.status(), 200);
    assert_eq!(session_cookie(&response), None);
}

#[tokio::test]
async fn unreachable_users_store_surfaces_as_service_unavailable() {
    let sessions = Arc::new(MemoryStore::<SessionRecord>::new(IdStrategy::Token));
    let app = app_with_stores(
        sessions.clone(),
        Arc::new(OfflineStore::<User>::new()),
        Arc::new(MemoryStore::<Employee>::new(IdStrategy::Sequential)),
        Arc::new(MemoryStore::<Department>::new(IdStrategy::Sequential)),
    );

    let user = json!({
        "username": "ada", "firstname": "Ada", "lastname": "L",
        "email": "ada@x.com", "phone": "1", "password": "pw"
    });
    let response = send_on(&app, "POST", "/register", Some(user), None).await;
    assert_eq!(response.status(), 503);

    let login = json!({"username": "ada", "password": "pw"});
    let response = send_on(&app, "POST", "/login", Some(login), None).await;
    assert_eq!(response.status(), 503);

    // An already authenticated session cannot load its profile either.
    let session = sessions
        .create(&NewSession {
            id: None,
            user_id: Some(1),
            last_used: Utc::now(),
        })
        .await
        .unwrap();
    let response = send_on(&app, "GET", "/me", None, Some(&session.id)).await;
    assert_eq!(response.status(), 503);
}

#[tokio::test]
async fn unreachable_personnel_store_degrades_department_views() {
    let base = TestApp::new();
    let token = base.register_and_login("admin", "pw").await;

    let department = json!({"name": "Eng", "location": "HQ", "email": "eng@x.com"});
    base.send("POST", "/departments", Some(department), Some(&token))
        .await;

    let app = app_with_stores(
        base.sessions.clone(),
        base.users.clone(),
        Arc::new(OfflineStore::<Employee>::new()),
        base.departments.clone(),
    );

    // Detail view substitutes a placeholder roster.
    let response = send_on(&app, "GET", "/departments/1", None, Some(&token)).await;
    assert_eq!(response.status(), 200);
    let body = json_body(response).await;
    assert_eq!(body["department"]["name"], "Eng");
    assert!(body["employees"].is_null());

    // Without the reference check, the delete is refused outright.
    let response = send_on(&app, "DELETE", "/departments/1", None, Some(&token)).await;
    assert_eq!(response.status(), 503);
    assert!(base.departments.get(&1).await.is_ok());
}

#[tokio::test]
async fn unreachable_departments_store_degrades_employee_views() {
    let base = TestApp::new();
    let token = base.register_and_login("admin", "pw").await;

    let department = json!({"name": "Eng", "location": "HQ", "email": "eng@x.com"});
    base.send("POST", "/departments", Some(department), Some(&token))
        .await;
    let employee = json!({
        "firstname": "A", "lastname": "B", "hiredate": "2020-01-01", "occupation": 1
    });
    base.send("POST", "/personnel", Some(employee), Some(&token))
        .await;

    let app = app_with_stores(
        base.sessions.clone(),
        base.users.clone(),
        base.personnel.clone(),
        Arc::new(OfflineStore::<Department>::new()),
    );

    // Employee detail substitutes a placeholder occupation.
    let response = send_on(&app, "GET", "/personnel/1", None, Some(&token)).await;
    assert_eq!(response.status(), 200);
    let body = json_body(response).await;
    assert_eq!(body["employee"]["firstname"], "A");
    assert!(body["department"].is_null());

    // Department operations fail as unavailable.
    let response = send_on(&app, "GET", "/departments", None, Some(&token)).await;
    assert_eq!(response.status(), 503);

    let new_department = json!({"name": "Ops", "location": "B2", "email": "ops@x.com"});
    let response = send_on(
        &app,
        "POST",
        "/departments",
        Some(new_department),
        Some(&token),
    )
    .await;
    assert_eq!(response.status(), 503);

    // Creating an employee needs the reference check, so it degrades too.
    let new_employee = json!({
        "firstname": "C", "lastname": "D", "hiredate": "2021-01-01", "occupation": 1
    });
    let response = send_on(&app, "POST", "/personnel", Some(new_employee), Some(&token)).await;
    assert_eq!(response.status(), 503);
}
