//! The single signed-in user, mirrored to storage on every change.

use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::models::User;
use crate::persist::{load_json, remove_key, save_json, SESSION_USER_KEY};
use crate::traits::{AuthProvider, KeyValueStore};

pub struct Session {
    kv: Arc<dyn KeyValueStore>,
    auth: Arc<dyn AuthProvider>,
    user: Option<User>,
}

impl Session {
    /// Restores the stored session user, if any survived the last run.
    pub async fn restore(kv: Arc<dyn KeyValueStore>, auth: Arc<dyn AuthProvider>) -> Self {
        let user: Option<User> = load_json(kv.as_ref(), SESSION_USER_KEY).await;
        if let Some(u) = &user {
            log::info!("Restored session for {}", u.email);
        }
        Self { kv, auth, user }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn auth(&self) -> &dyn AuthProvider {
        self.auth.as_ref()
    }

    async fn set_user(&mut self, user: User) -> User {
        save_json(self.kv.as_ref(), SESSION_USER_KEY, &user).await;
        self.user = Some(user.clone());
        user
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<User> {
        let user = self.auth.login(email, password).await?;
        log::info!("User {} logged in", user.email);
        Ok(self.set_user(user).await)
    }

    pub async fn signup(&self, name: &str, email: &str, password: &str) -> Result<()> {
        self.auth.signup(name, email, password).await?;
        log::info!("Registered {}", email);
        Ok(())
    }

    pub async fn logout(&mut self) {
        if let Some(u) = self.user.take() {
            log::info!("User {} logged out", u.email);
        }
        remove_key(self.kv.as_ref(), SESSION_USER_KEY).await;
    }

    pub async fn update_profile(&mut self, name: &str) -> Result<User> {
        let current = self
            .user
            .as_ref()
            .ok_or_else(|| AppError::Unauthorized("No user is logged in.".into()))?;
        let updated = self.auth.update_profile(current, name).await?;
        Ok(self.set_user(updated).await)
    }
}
