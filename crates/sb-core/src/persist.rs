//! JSON blob helpers over [`KeyValueStore`].
//!
//! Storage problems never surface to callers: a failed or unparsable read is
//! treated as "nothing stored", a failed write is logged and dropped.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::traits::KeyValueStore;

pub const SUGGESTIONS_KEY: &str = "suggestions";
pub const MODERATION_LOGS_KEY: &str = "moderationLogs";
pub const SESSION_USER_KEY: &str = "authUser";
pub const DRAFT_KEY: &str = "suggestionDraft";
pub const THEME_KEY: &str = "theme";

pub async fn load_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    let raw = match store.get(key).await {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            log::error!("Failed to read '{}' from storage: {}", key, e);
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            log::error!("Failed to parse stored '{}', starting empty: {}", key, e);
            None
        }
    }
}

pub async fn save_json<T: Serialize + ?Sized>(store: &dyn KeyValueStore, key: &str, value: &T) {
    let raw = match serde_json::to_string(value) {
        Ok(raw) => raw,
        Err(e) => {
            log::error!("Failed to serialize '{}': {}", key, e);
            return;
        }
    };
    if let Err(e) = store.set(key, &raw).await {
        log::error!("Failed to save '{}' to storage: {}", key, e);
    }
}

pub async fn remove_key(store: &dyn KeyValueStore, key: &str) {
    if let Err(e) = store.remove(key).await {
        log::error!("Failed to remove '{}' from storage: {}", key, e);
    }
}
