//! Process-local [`KeyValueStore`], used when no persistent backend is compiled in.

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::anyhow;
use async_trait::async_trait;

use crate::traits::KeyValueStore;

#[derive(Debug, Default)]
pub struct InMemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let entries = self.entries.lock().map_err(|_| anyhow!("store lock poisoned"))?;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        let mut entries = self.entries.lock().map_err(|_| anyhow!("store lock poisoned"))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> anyhow::Result<()> {
        let mut entries = self.entries.lock().map_err(|_| anyhow!("store lock poisoned"))?;
        entries.remove(key);
        Ok(())
    }
}
