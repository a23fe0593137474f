//! # Core Traits (Ports)
//!
//! Any plugin must implement these traits to be used by the binary.

use async_trait::async_trait;
#[cfg(any(test, feature = "testing"))]
use mockall::automock;

use crate::error::Result;
use crate::models::{Analysis, User};

/// Key-value persistence contract. Values are whole JSON blobs, rewritten in full.
#[cfg_attr(any(test, feature = "testing"), automock)]
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the raw blob stored under `key`, if any.
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>>;
    /// Replaces the blob stored under `key`.
    async fn set(&self, key: &str, value: &str) -> anyhow::Result<()>;
    /// Deletes `key`. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> anyhow::Result<()>;
}

/// Classification collaborator contract.
#[cfg_attr(any(test, feature = "testing"), automock)]
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Suggests sentiment, category and tags for a new submission.
    async fn analyze(&self, title: &str, description: &str) -> anyhow::Result<Analysis>;
}

/// Identity contract. A stand-in for a real identity service.
#[cfg_attr(any(test, feature = "testing"), automock)]
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Checks credentials and opens a session user.
    async fn login(&self, email: &str, password: &str) -> Result<User>;

    /// Registers a new account. Does not log in.
    async fn signup(&self, name: &str, email: &str, password: &str) -> Result<()>;

    /// Renames the session user and regenerates their avatar.
    async fn update_profile(&self, user: &User, name: &str) -> Result<User>;

    /// Verifies the moderator password that unlocks admin mode.
    async fn verify_admin_password(&self, password: &str) -> bool;
}
