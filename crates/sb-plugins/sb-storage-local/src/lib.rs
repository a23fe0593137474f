//! # sb-storage-local
//! suggestion-box/crates/sb-plugins/sb-storage-local/src/lib.rs
//! Local filesystem implementation of `KeyValueStore`.
//! One JSON file per key under a data directory, replaced whole on every write.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use async_trait::async_trait;
use sb_core::traits::KeyValueStore;
use tokio::fs;

pub struct LocalKeyValueStore {
    /// Directory holding one `<key>.json` per stored blob (e.g., "./data")
    root_path: PathBuf,
}

impl LocalKeyValueStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root_path: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root_path
    }

    /// Keys map straight to file names, so only a safe alphabet is accepted.
    fn path_for(&self, key: &str) -> anyhow::Result<PathBuf> {
        let safe = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !safe {
            bail!("invalid storage key '{}'", key);
        }
        Ok(self.root_path.join(format!("{key}.json")))
    }
}

#[async_trait]
impl KeyValueStore for LocalKeyValueStore {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path).await {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("reading {}", path.display())),
        }
    }

    /// Writes beside the target then renames, so readers never see half a blob.
    async fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.root_path)
            .await
            .with_context(|| format!("creating {}", self.root_path.display()))?;

        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)
            .await
            .with_context(|| format!("writing {}", tmp.display()))?;
        fs::rename(&tmp, &path)
            .await
            .with_context(|| format!("replacing {}", path.display()))?;
        log::debug!("Stored '{}' ({} bytes)", key, value.len());
        Ok(())
    }

    async fn remove(&self, key: &str) -> anyhow::Result<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("removing {}", path.display())),
        }
    }
}
