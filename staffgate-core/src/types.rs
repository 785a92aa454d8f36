//! Record and wire types shared across the staffgate services
//!
//! The four record collections (users, personnel, departments, sessions) plus
//! the filter/pagination vocabulary the stores speak.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

/// A registered gateway user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub phone: String,
    pub password: String,
}

/// Creation payload for [`User`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub phone: String,
    pub password: String,
}

impl NewUser {
    pub fn validate(&self) -> StoreResult<()> {
        require_nonempty("username", &self.username)?;
        require_nonempty("firstname", &self.firstname)?;
        require_nonempty("lastname", &self.lastname)?;
        require_nonempty("email", &self.email)?;
        require_nonempty("phone", &self.phone)?;
        require_nonempty("password", &self.password)?;
        Ok(())
    }
}

/// A department record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Department {
    pub id: i64,
    pub name: String,
    pub location: String,
    pub email: String,
}

/// Creation payload for [`Department`]. `name` and `email` are unique within
/// the departments store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewDepartment {
    pub name: String,
    pub location: String,
    pub email: String,
}

impl NewDepartment {
    pub fn validate(&self) -> StoreResult<()> {
        require_nonempty("name", &self.name)?;
        require_nonempty("location", &self.location)?;
        require_nonempty("email", &self.email)?;
        Ok(())
    }
}

/// A personnel record. `occupation` references a [`Department`] id; the
/// storage layer does not enforce the link.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    pub id: i64,
    pub firstname: String,
    pub lastname: String,
    pub hiredate: NaiveDate,
    pub occupation: i64,
}

/// Creation payload for [`Employee`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEmployee {
    pub firstname: String,
    pub lastname: String,
    pub hiredate: NaiveDate,
    pub occupation: i64,
}

impl NewEmployee {
    pub fn validate(&self) -> StoreResult<()> {
        require_nonempty("firstname", &self.firstname)?;
        require_nonempty("lastname", &self.lastname)?;
        if self.occupation <= 0 {
            return Err(StoreError::validation(
                "occupation",
                "must be a department id",
            ));
        }
        Ok(())
    }
}

/// A server-side session row. `id` is the opaque token carried by the
/// `session_id` cookie; `user_id` is `None` for anonymous sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: String,
    pub user_id: Option<i64>,
    pub last_used: DateTime<Utc>,
}

/// Creation payload for [`SessionRecord`]. The gateway supplies the token;
/// a store reached directly may generate one when `id` is absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSession {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub user_id: Option<i64>,
    pub last_used: DateTime<Utc>,
}

/// Partial update for [`SessionRecord`]. `last_used` is always refreshed;
/// `user_id` is written only when the session was mutated this request
/// (`Some(None)` clears it to anonymous).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Option<i64>>,
    pub last_used: DateTime<Utc>,
}

/// A single filter predicate, `(field, op, value)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub name: String,
    pub op: FilterOp,
    pub val: serde_json::Value,
}

impl Filter {
    pub fn eq(name: &str, val: impl Into<serde_json::Value>) -> Self {
        Self {
            name: name.to_string(),
            op: FilterOp::Eq,
            val: val.into(),
        }
    }

    pub fn ne(name: &str, val: impl Into<serde_json::Value>) -> Self {
        Self {
            name: name.to_string(),
            op: FilterOp::Ne,
            val: val.into(),
        }
    }
}

/// Filter operators. Equality is the contract minimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterOp {
    #[serde(rename = "==")]
    Eq,
    #[serde(rename = "!=")]
    Ne,
}

/// The `q` query-parameter document: a conjunction of filters, optionally
/// collapsed to a single bare record (`single: true`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryDocument {
    pub filters: Vec<Filter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub single: Option<bool>,
}

/// Parameters of a paginated list call. `None` fields fall back to the
/// configured defaults.
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    pub filters: Vec<Filter>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

impl ListQuery {
    pub fn filtered(filters: Vec<Filter>) -> Self {
        Self {
            filters,
            ..Self::default()
        }
    }

    pub fn page(page: u64, per_page: u64) -> Self {
        Self {
            filters: Vec::new(),
            page: Some(page),
            per_page: Some(per_page),
        }
    }
}

/// One page of a list response, 1-indexed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultPage<T> {
    pub objects: Vec<T>,
    pub page: u64,
    pub total_pages: u64,
    pub num_results: u64,
}

fn require_nonempty(field: &str, value: &str) -> StoreResult<()> {
    if value.trim().is_empty() {
        return Err(StoreError::validation(field, "must not be empty"));
    }
    Ok(())
}
