//! Infrastructure implementations of the `ResultCache` port.
//!
//! `DiskCache` keeps one JSON file per entry under `~/.studioctl/cache/`,
//! named by the SHA-256 of the key. The file stores the key alongside the
//! value so prefix invalidation can work without an index.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::application::ports::ResultCache;
use crate::infra::config::studioctl_dir;

#[derive(Serialize, Deserialize)]
struct Entry {
    key: String,
    value: serde_json::Value,
}

/// File-per-entry cache directory.
pub struct DiskCache {
    dir: PathBuf,
}

impl DiskCache {
    /// Cache under the default directory (`~/.studioctl/cache`).
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self> {
        Ok(Self::with_dir(studioctl_dir()?.join("cache")))
    }

    /// Cache under an explicit directory (used in tests).
    #[must_use]
    pub fn with_dir(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        let digest = Sha256::digest(key.as_bytes());
        self.dir.join(format!("{digest:x}.json"))
    }

    /// Every entry file currently on disk.
    fn entry_files(&self) -> Result<Vec<PathBuf>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }
        let mut files = Vec::new();
        for entry in std::fs::read_dir(&self.dir)
            .with_context(|| format!("reading cache dir {}", self.dir.display()))?
        {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                files.push(path);
            }
        }
        Ok(files)
    }
}

fn read_entry(path: &Path) -> Result<Entry> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading cache entry {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("parsing cache entry {}", path.display()))
}

fn remove(path: &Path) -> Result<()> {
    std::fs::remove_file(path).with_context(|| format!("removing cache entry {}", path.display()))
}

impl ResultCache for DiskCache {
    fn get(&self, key: &str) -> Result<Option<serde_json::Value>> {
        let path = self.entry_path(key);
        if !path.exists() {
            return Ok(None);
        }
        let entry = match read_entry(&path) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::debug!(error = %e, "unreadable cache entry");
                return Ok(None);
            }
        };
        // A digest collision is a miss, not someone else's value.
        if entry.key != key {
            return Ok(None);
        }
        Ok(Some(entry.value))
    }

    fn put(&self, key: &str, value: &serde_json::Value) -> Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("creating cache dir {}", self.dir.display()))?;
        let path = self.entry_path(key);
        let content = serde_json::to_string(&Entry {
            key: key.to_string(),
            value: value.clone(),
        })
        .context("serializing cache entry")?;

        let temp_path = path.with_extension("json.tmp");
        std::fs::write(&temp_path, content)
            .with_context(|| format!("writing temp file {}", temp_path.display()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&temp_path, std::fs::Permissions::from_mode(0o600))
                .with_context(|| format!("setting permissions on {}", temp_path.display()))?;
        }

        std::fs::rename(&temp_path, &path)
            .with_context(|| format!("finalizing cache entry {}", path.display()))
    }

    fn invalidate_prefix(&self, prefix: &str) -> Result<usize> {
        let mut removed = 0;
        for path in self.entry_files()? {
            match read_entry(&path) {
                Ok(entry) if entry.key.starts_with(prefix) => {
                    remove(&path)?;
                    removed += 1;
                }
                Ok(_) => {}
                // Unreadable entries can never be served; drop them too.
                Err(_) => remove(&path)?,
            }
        }
        Ok(removed)
    }

    fn clear(&self) -> Result<usize> {
        let files = self.entry_files()?;
        for path in &files {
            remove(path)?;
        }
        Ok(files.len())
    }
}

/// In-process cache; nothing outlives the value.
#[derive(Default)]
pub struct MemoryCache {
    entries: Mutex<BTreeMap<String, serde_json::Value>>,
}

impl MemoryCache {
    fn lock(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, serde_json::Value>>> {
        self.entries
            .lock()
            .map_err(|_| anyhow::anyhow!("cache lock poisoned"))
    }
}

impl ResultCache for MemoryCache {
    fn get(&self, key: &str) -> Result<Option<serde_json::Value>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn put(&self, key: &str, value: &serde_json::Value) -> Result<()> {
        self.lock()?.insert(key.to_string(), value.clone());
        Ok(())
    }

    fn invalidate_prefix(&self, prefix: &str) -> Result<usize> {
        let mut entries = self.lock()?;
        let before = entries.len();
        entries.retain(|k, _| !k.starts_with(prefix));
        Ok(before - entries.len())
    }

    fn clear(&self) -> Result<usize> {
        let mut entries = self.lock()?;
        let n = entries.len();
        entries.clear();
        Ok(n)
    }
}

/// The cache a command runs with, chosen from config and `--no-cache`.
pub enum CacheBackend {
    Disk(DiskCache),
    /// Every lookup misses and nothing is stored.
    Disabled,
}

impl ResultCache for CacheBackend {
    fn get(&self, key: &str) -> Result<Option<serde_json::Value>> {
        match self {
            Self::Disk(c) => c.get(key),
            Self::Disabled => Ok(None),
        }
    }

    fn put(&self, key: &str, value: &serde_json::Value) -> Result<()> {
        match self {
            Self::Disk(c) => c.put(key, value),
            Self::Disabled => Ok(()),
        }
    }

    fn invalidate_prefix(&self, prefix: &str) -> Result<usize> {
        match self {
            Self::Disk(c) => c.invalidate_prefix(prefix),
            Self::Disabled => Ok(0),
        }
    }

    fn clear(&self) -> Result<usize> {
        match self {
            Self::Disk(c) => c.clear(),
            Self::Disabled => Ok(0),
        }
    }
}
