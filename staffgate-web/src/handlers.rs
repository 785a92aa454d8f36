//! HTTP request handlers for the staffgate gateway

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};

use staffgate_app::{DepartmentDetail, EmployeeDetail};
use staffgate_core::{Department, Employee, NewDepartment, NewEmployee, NewUser, ResultPage, User};

use crate::extract::AppJson;
use crate::middleware::SessionCell;
use crate::{AppState, WebResult};

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    timestamp: chrono::DateTime<chrono::Utc>,
    version: String,
}

/// Session status, served at `/`
#[derive(Serialize)]
pub struct SessionStatus {
    pub authenticated: bool,
    pub user_id: Option<i64>,
}

/// Login request
#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// A user as shown to clients; the stored password never leaves the gateway.
#[derive(Serialize)]
pub struct UserProfile {
    pub id: i64,
    pub username: String,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub phone: String,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            firstname: user.firstname,
            lastname: user.lastname,
            email: user.email,
            phone: user.phone,
        }
    }
}

/// Pagination query parameters
#[derive(Deserialize)]
pub struct PageParams {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

/// Health check endpoint
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Session status for the current request
pub async fn index(Extension(session): Extension<SessionCell>) -> Json<SessionStatus> {
    let user_id = session.user_id().await;
    Json(SessionStatus {
        authenticated: user_id.is_some(),
        user_id,
    })
}

/// Register a new user
pub async fn register(
    State(state): State<AppState>,
    AppJson(new): AppJson<NewUser>,
) -> WebResult<(StatusCode, Json<UserProfile>)> {
    let user = state.accounts.register(&new).await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Log in and bind the session to the user
pub async fn login(
    State(state): State<AppState>,
    Extension(session): Extension<SessionCell>,
    AppJson(request): AppJson<LoginRequest>,
) -> WebResult<Json<UserProfile>> {
    let user = state
        .accounts
        .login(&request.username, &request.password)
        .await?;
    session.login(user.id).await;
    Ok(Json(user.into()))
}

/// Log out; the session row stays alive as anonymous
pub async fn logout(Extension(session): Extension<SessionCell>) -> Json<SessionStatus> {
    session.logout().await;
    Json(SessionStatus {
        authenticated: false,
        user_id: None,
    })
}

/// Profile of the logged-in user
pub async fn me(
    State(state): State<AppState>,
    Extension(session): Extension<SessionCell>,
) -> WebResult<Json<UserProfile>> {
    let user_id = session.require_user().await?;
    let user = state.accounts.profile(user_id).await?;
    Ok(Json(user.into()))
}

/// Paginated personnel list (public)
pub async fn list_personnel(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> WebResult<Json<ResultPage<Employee>>> {
    let page = state
        .directory
        .list_personnel(params.page, params.per_page)
        .await?;
    Ok(Json(page))
}

/// Create an employee
pub async fn create_employee(
    State(state): State<AppState>,
    Extension(session): Extension<SessionCell>,
    AppJson(new): AppJson<NewEmployee>,
) -> WebResult<(StatusCode, Json<Employee>)> {
    session.require_user().await?;
    let employee = state.directory.add_employee(&new).await?;
    Ok((StatusCode::CREATED, Json(employee)))
}

/// Employee detail with its department (department omitted when that store
/// is down)
pub async fn show_employee(
    State(state): State<AppState>,
    Extension(session): Extension<SessionCell>,
    Path(id): Path<i64>,
) -> WebResult<Json<EmployeeDetail>> {
    session.require_user().await?;
    let detail = state.directory.employee_detail(id).await?;
    Ok(Json(detail))
}

/// Delete an employee (no referential guard on this side)
pub async fn delete_employee(
    State(state): State<AppState>,
    Extension(session): Extension<SessionCell>,
    Path(id): Path<i64>,
) -> WebResult<StatusCode> {
    session.require_user().await?;
    state.guard.delete_employee(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Paginated department list (public)
pub async fn list_departments(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> WebResult<Json<ResultPage<Department>>> {
    let page = state
        .directory
        .list_departments(params.page, params.per_page)
        .await?;
    Ok(Json(page))
}

/// Create a department
pub async fn create_department(
    State(state): State<AppState>,
    Extension(session): Extension<SessionCell>,
    AppJson(new): AppJson<NewDepartment>,
) -> WebResult<(StatusCode, Json<Department>)> {
    session.require_user().await?;
    let department = state.directory.add_department(&new).await?;
    Ok((StatusCode::CREATED, Json(department)))
}

/// Department detail with its roster (roster omitted when the personnel
/// store is down)
pub async fn show_department(
    State(state): State<AppState>,
    Extension(session): Extension<SessionCell>,
    Path(id): Path<i64>,
) -> WebResult<Json<DepartmentDetail>> {
    session.require_user().await?;
    let detail = state.directory.department_detail(id).await?;
    Ok(Json(detail))
}

/// Delete a department through the integrity guard
pub async fn delete_department(
    State(state): State<AppState>,
    Extension(session): Extension<SessionCell>,
    Path(id): Path<i64>,
) -> WebResult<StatusCode> {
    session.require_user().await?;
    state.guard.delete_department(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
