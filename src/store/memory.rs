//! In-process store with Vault KV v1 listing semantics.
//! Backs the test-suite and any caller that wants to plan moves without a server.

use std::collections::BTreeMap;
use std::sync::Mutex;

use super::{SecretStore, StoreError, ValueBundle};

/// Keys are kept sorted, so listings come back in the same lexical order Vault uses.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, ValueBundle>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a store from `(path, value)` pairs.
    pub fn with_entries<I, P>(entries: I) -> Self
    where
        I: IntoIterator<Item = (P, ValueBundle)>,
        P: Into<String>,
    {
        let map = entries.into_iter().map(|(p, v)| (p.into(), v)).collect();
        Self {
            entries: Mutex::new(map),
        }
    }

    pub fn insert(&self, path: impl Into<String>, value: ValueBundle) {
        self.lock().insert(path.into(), value);
    }

    pub fn get(&self, path: &str) -> Option<ValueBundle> {
        self.lock().get(path).cloned()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.lock().contains_key(path)
    }

    /// All stored leaf paths, sorted.
    pub fn paths(&self) -> Vec<String> {
        self.lock().keys().cloned().collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, ValueBundle>> {
        // A poisoned map is still a consistent map; every mutation is a single insert/remove.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn check_leaf(path: &str) -> Result<(), StoreError> {
    if path.is_empty() || path.ends_with('/') {
        return Err(StoreError::Rejected {
            path: path.to_string(),
            reason: "not a leaf path".into(),
        });
    }
    Ok(())
}

impl SecretStore for MemoryStore {
    fn list(&self, path: &str) -> Result<Option<Vec<String>>, StoreError> {
        let prefix = if path.is_empty() || path.ends_with('/') {
            path.to_string()
        } else {
            format!("{path}/")
        };

        let entries = self.lock();
        let mut children: Vec<String> = Vec::new();
        for key in entries.keys().filter(|k| k.starts_with(&prefix)) {
            let rest = &key[prefix.len()..];
            let child = match rest.find('/') {
                Some(idx) => &rest[..=idx],
                None => rest,
            };
            if children.last().map(String::as_str) != Some(child) {
                children.push(child.to_string());
            }
        }

        Ok((!children.is_empty()).then_some(children))
    }

    fn read(&self, path: &str) -> Result<Option<ValueBundle>, StoreError> {
        Ok(self.lock().get(path).cloned())
    }

    fn write(&self, path: &str, value: &ValueBundle) -> Result<(), StoreError> {
        check_leaf(path)?;
        self.lock().insert(path.to_string(), value.clone());
        Ok(())
    }

    fn delete(&self, path: &str) -> Result<(), StoreError> {
        check_leaf(path)?;
        self.lock().remove(path);
        Ok(())
    }
}
