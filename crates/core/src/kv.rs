// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Size-bounded key/value storage.
//!
//! Values are whole strings stored under short keys. Every `set` replaces the
//! value atomically: readers see either the old value or the new one, never a
//! partial write. The total size of all values is bounded by a quota, and a
//! write that would exceed it fails without touching the stored value.

use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use fs2::FileExt;

use crate::error::{Error, Result};

/// Default quota: 5 MiB, the usual per-origin budget of browser local storage.
pub const DEFAULT_QUOTA_BYTES: u64 = 5 * 1024 * 1024;

const VALUE_EXT: &str = "json";
const LOCK_FILE_NAME: &str = ".lock";

/// Rewrites a stored value; see [`KvStore::update`].
pub type UpdateFn<'a> = dyn FnMut(Option<&str>) -> Result<Option<String>> + 'a;

/// A string key/value store with a total size quota.
pub trait KvStore: Send {
    /// Returns the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// Fails with [`Error::QuotaExceeded`] if the store would grow past its quota.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`. Removing a missing key is not an error.
    fn remove(&mut self, key: &str) -> Result<()>;

    /// Reads, rewrites and stores `key` as one step.
    ///
    /// `f` receives the current value and returns the value to store; `None`
    /// removes the key. No other writer, in this process or another, can
    /// change the key between the read and the write. Returning the current
    /// value unchanged writes nothing.
    fn update(&mut self, key: &str, f: &mut UpdateFn<'_>) -> Result<()>;

    /// Returns the total number of bytes currently stored.
    fn usage(&self) -> Result<u64>;

    /// Returns the quota in bytes.
    fn quota(&self) -> u64;
}

fn validate_key(key: &str) -> Result<()> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(Error::InvalidKey(key.to_string()))
    }
}

fn check_quota(others: u64, value: &str, quota: u64) -> Result<()> {
    let needed = others + value.len() as u64;
    if needed > quota {
        return Err(Error::QuotaExceeded { needed, quota });
    }
    Ok(())
}

/// File-backed store: one file per key inside a directory.
///
/// Writes go to a temporary file that is fsynced and renamed over the old
/// value. Writers across processes are serialized with an exclusive lock on
/// `<dir>/.lock`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
    quota: u64,
}

impl FileStore {
    /// Opens (creating if needed) a store in `dir`.
    pub fn open(dir: impl AsRef<Path>, quota: u64) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(FileStore { dir, quota })
    }

    /// Returns the directory backing this store.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the file a key is stored in.
    pub fn path_for(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{key}.{VALUE_EXT}")))
    }

    /// Takes the writer lock. Released when the returned file is dropped.
    fn lock(&self) -> Result<File> {
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(self.dir.join(LOCK_FILE_NAME))?;
        file.lock_exclusive()?;
        Ok(file)
    }

    fn usage_excluding(&self, skip: Option<&Path>) -> Result<u64> {
        let mut total = 0;
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(VALUE_EXT) {
                continue;
            }
            if Some(path.as_path()) == skip {
                continue;
            }
            total += fs::metadata(&path)?.len();
        }
        Ok(total)
    }

    /// Replaces the file for `key`. The caller holds the writer lock.
    fn write_locked(&self, key: &str, path: &Path, value: &str) -> Result<()> {
        check_quota(self.usage_excluding(Some(path))?, value, self.quota)?;

        let tmp = self.dir.join(format!(".{key}.{VALUE_EXT}.tmp"));
        {
            let mut file = File::create(&tmp)?;
            file.write_all(value.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&tmp, path)?;

        tracing::trace!(key, bytes = value.len(), "stored value");
        Ok(())
    }
}

fn read_if_present(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn remove_file_if_present(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

impl KvStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        read_if_present(&self.path_for(key)?)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        let _lock = self.lock()?;
        self.write_locked(key, &path, value)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        let _lock = self.lock()?;
        remove_file_if_present(&path)
    }

    fn update(&mut self, key: &str, f: &mut UpdateFn<'_>) -> Result<()> {
        let path = self.path_for(key)?;
        let _lock = self.lock()?;

        let current = read_if_present(&path)?;
        let next = f(current.as_deref())?;
        if next == current {
            return Ok(());
        }
        match next {
            Some(value) => self.write_locked(key, &path, &value),
            None => remove_file_if_present(&path),
        }
    }

    fn usage(&self) -> Result<u64> {
        self.usage_excluding(None)
    }

    fn quota(&self) -> u64 {
        self.quota
    }
}

/// In-memory store.
///
/// Clones share the same entries, so a clone handed to a second owner
/// observes the same data, the way two loads of the same profile would.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
    quota: u64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_quota(DEFAULT_QUOTA_BYTES)
    }

    pub fn with_quota(quota: u64) -> Self {
        MemoryStore {
            entries: Arc::new(Mutex::new(HashMap::new())),
            quota,
        }
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // A poisoned map still holds whole values; keep using it.
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        validate_key(key)?;
        Ok(self.entries().get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        validate_key(key)?;
        let mut entries = self.entries();
        let others: u64 = entries
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(_, v)| v.len() as u64)
            .sum();
        check_quota(others, value, self.quota)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        validate_key(key)?;
        self.entries().remove(key);
        Ok(())
    }

    fn update(&mut self, key: &str, f: &mut UpdateFn<'_>) -> Result<()> {
        validate_key(key)?;
        let mut entries = self.entries();
        let current = entries.get(key).cloned();
        let next = f(current.as_deref())?;
        if next == current {
            return Ok(());
        }
        match next {
            Some(value) => {
                let others: u64 = entries
                    .iter()
                    .filter(|(k, _)| k.as_str() != key)
                    .map(|(_, v)| v.len() as u64)
                    .sum();
                check_quota(others, &value, self.quota)?;
                entries.insert(key.to_string(), value);
            }
            None => {
                entries.remove(key);
            }
        }
        Ok(())
    }

    fn usage(&self) -> Result<u64> {
        Ok(self.entries().values().map(|v| v.len() as u64).sum())
    }

    fn quota(&self) -> u64 {
        self.quota
    }
}

#[cfg(test)]
#[path = "kv_tests.rs"]
mod tests;
