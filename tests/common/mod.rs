//! Shared helpers for integration tests.
#![allow(dead_code)]

use std::sync::Mutex;

use vault_kv_mv::{MemoryStore, SecretStore, StoreError, ValueBundle};

pub fn bundle(pairs: &[(&str, &str)]) -> ValueBundle {
    pairs.iter().map(|(k, v)| (*k, *v)).collect()
}

pub fn test_value() -> ValueBundle {
    bundle(&[("test", "test")])
}

/// Which operation a `RecordingStore` should fail, and on which path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    List,
    Read,
    Write,
    Delete,
}

/// Wraps a MemoryStore, records every call and fails one (op, path) on demand.
pub struct RecordingStore {
    pub inner: MemoryStore,
    pub calls: Mutex<Vec<(Op, String)>>,
    fail: Option<(Op, String)>,
}

impl RecordingStore {
    pub fn new(inner: MemoryStore) -> Self {
        Self {
            inner,
            calls: Mutex::new(Vec::new()),
            fail: None,
        }
    }

    pub fn failing(inner: MemoryStore, op: Op, path: &str) -> Self {
        Self {
            fail: Some((op, path.to_string())),
            ..Self::new(inner)
        }
    }

    pub fn calls(&self) -> Vec<(Op, String)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn mutations(&self) -> usize {
        self.calls()
            .iter()
            .filter(|(op, _)| matches!(op, Op::Write | Op::Delete))
            .count()
    }

    fn record(&self, op: Op, path: &str) -> Result<(), StoreError> {
        self.calls.lock().unwrap().push((op, path.to_string()));
        match &self.fail {
            Some((fail_op, fail_path)) if *fail_op == op && fail_path == path => Err(StoreError::Status {
                status: 403,
                message: "permission denied".into(),
            }),
            _ => Ok(()),
        }
    }
}

impl SecretStore for RecordingStore {
    fn list(&self, path: &str) -> Result<Option<Vec<String>>, StoreError> {
        self.record(Op::List, path)?;
        self.inner.list(path)
    }

    fn read(&self, path: &str) -> Result<Option<ValueBundle>, StoreError> {
        self.record(Op::Read, path)?;
        self.inner.read(path)
    }

    fn write(&self, path: &str, value: &ValueBundle) -> Result<(), StoreError> {
        self.record(Op::Write, path)?;
        self.inner.write(path, value)
    }

    fn delete(&self, path: &str) -> Result<(), StoreError> {
        self.record(Op::Delete, path)?;
        self.inner.delete(path)
    }
}

pub mod fake_vault;
