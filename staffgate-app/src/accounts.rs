//! Account workflows
//!
//! Registration, credential login and profile lookup against the users store.
//! The gateway validates payloads before forwarding; the store itself checks
//! almost nothing.

use std::sync::Arc;

use tracing::{debug, info};

use staffgate_core::{Filter, NewUser, User};
use staffgate_store::EntityStore;

use crate::{AppError, AppResult};

/// User-account workflows over the users store.
pub struct Accounts {
    users: Arc<dyn EntityStore<User>>,
}

impl Accounts {
    pub fn new(users: Arc<dyn EntityStore<User>>) -> Self {
        Self { users }
    }

    pub async fn register(&self, new: &NewUser) -> AppResult<User> {
        new.validate()?;
        let user = self.users.create(new).await?;
        info!(user_id = user.id, username = %user.username, "registered user");
        Ok(user)
    }

    /// Look the user up by username and compare credentials.
    ///
    /// Usernames are not unique in the store; the lookup takes whichever
    /// record matches first, same as the original system.
    pub async fn login(&self, username: &str, password: &str) -> AppResult<User> {
        let user = self
            .users
            .find_one(&[Filter::eq("username", username)])
            .await?
            .ok_or_else(|| AppError::unauthorized("unknown username"))?;

        // TODO: replace plaintext equality once a password hashing format is
        // adopted; stored rows carry raw passwords today.
        if user.password != password {
            debug!(%username, "password mismatch");
            return Err(AppError::unauthorized("wrong password"));
        }

        debug!(user_id = user.id, "credentials accepted");
        Ok(user)
    }

    pub async fn profile(&self, user_id: i64) -> AppResult<User> {
        Ok(self.users.get(&user_id).await?)
    }
}
