//! # sb-auth-simple
//!
//! In-memory stand-in for an identity service implementing `AuthProvider`.
//! Accounts live for the life of the process; every call waits out a
//! simulated network latency. Passwords, including the admin password,
//! are kept only as Argon2 hashes.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::anyhow;
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use async_trait::async_trait;
use sb_core::avatar::generate_avatar;
use sb_core::error::{AppError, Result};
use sb_core::models::User;
use sb_core::traits::AuthProvider;
use uuid::Uuid;

pub const SEED_EMAIL: &str = "test@example.com";
pub const SEED_PASSWORD: &str = "password123";
pub const SEED_NAME: &str = "Test User";

struct Account {
    name: String,
    password_hash: String,
}

fn hash_password(password: &str) -> anyhow::Result<String> {
    let mut bytes = [0u8; 16];
    getrandom::getrandom(&mut bytes).map_err(|e| anyhow!("salt generation failed: {e}"))?;
    let salt = SaltString::encode_b64(&bytes).map_err(|e| anyhow!("salt encoding failed: {e}"))?;
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow!("password hashing failed: {e}"))?;
    Ok(hash.to_string())
}

/// Verifies a password against a stored Argon2 hash.
fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(p) => p,
        Err(_) => return false,
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub struct MockUserDirectory {
    /// Keyed by lowercased email
    accounts: Mutex<HashMap<String, Account>>,
    admin_hash: String,
    latency: Duration,
}

impl MockUserDirectory {
    /// Seeds the directory with the demo account and hashes the admin password.
    pub fn new(admin_password: &str, latency: Duration) -> anyhow::Result<Self> {
        let mut accounts = HashMap::new();
        accounts.insert(
            SEED_EMAIL.to_string(),
            Account {
                name: SEED_NAME.to_string(),
                password_hash: hash_password(SEED_PASSWORD)?,
            },
        );

        Ok(Self {
            accounts: Mutex::new(accounts),
            admin_hash: hash_password(admin_password)?,
            latency,
        })
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    fn lock_poisoned() -> AppError {
        AppError::Internal("user directory lock poisoned".into())
    }
}

#[async_trait]
impl AuthProvider for MockUserDirectory {
    async fn login(&self, email: &str, password: &str) -> Result<User> {
        self.simulate_latency().await;
        let email = normalize_email(email);

        let name = {
            let accounts = self.accounts.lock().map_err(|_| Self::lock_poisoned())?;
            accounts
                .get(&email)
                .filter(|acct| verify_password(password, &acct.password_hash))
                .map(|acct| acct.name.clone())
        };

        match name {
            Some(name) => Ok(User {
                id: Uuid::now_v7(),
                avatar: generate_avatar(&name),
                name,
                email,
            }),
            None => {
                log::warn!("Failed login attempt for {}", email);
                Err(AppError::Unauthorized("Invalid email or password".into()))
            }
        }
    }

    async fn signup(&self, name: &str, email: &str, password: &str) -> Result<()> {
        self.simulate_latency().await;
        let email = normalize_email(email);
        let password_hash = hash_password(password).map_err(|e| AppError::Internal(e.to_string()))?;

        let mut accounts = self.accounts.lock().map_err(|_| Self::lock_poisoned())?;
        if accounts.contains_key(&email) {
            return Err(AppError::Conflict("User with this email already exists.".into()));
        }
        accounts.insert(
            email,
            Account {
                name: name.to_string(),
                password_hash,
            },
        );
        Ok(())
    }

    async fn update_profile(&self, user: &User, name: &str) -> Result<User> {
        self.simulate_latency().await;
        {
            let mut accounts = self.accounts.lock().map_err(|_| Self::lock_poisoned())?;
            if let Some(acct) = accounts.get_mut(&normalize_email(&user.email)) {
                acct.name = name.to_string();
            }
        }
        Ok(User {
            name: name.to_string(),
            avatar: generate_avatar(name),
            ..user.clone()
        })
    }

    async fn verify_admin_password(&self, password: &str) -> bool {
        self.simulate_latency().await;
        verify_password(password, &self.admin_hash)
    }
}
