//! Move execution: read old -> write new -> delete old, one entry at a time.
//!
//! The first store error halts the whole batch. Entries already moved stay at their
//! new location; nothing is retried or rolled back.

use tracing::{debug, info};

use crate::errors::MoveError;
use crate::store::SecretStore;

use super::mapping::PathMapping;

/// Entries that were fully moved (written and old path deleted), in execution order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveReport {
    pub moved: Vec<(String, String)>,
}

impl MoveReport {
    pub fn len(&self) -> usize {
        self.moved.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moved.is_empty()
    }
}

pub fn execute_moves<S: SecretStore + ?Sized>(store: &S, mapping: &PathMapping) -> Result<MoveReport, MoveError> {
    let mut report = MoveReport::default();

    for (old, new) in mapping.iter() {
        let value = match store.read(old) {
            Ok(Some(value)) => value,
            Ok(None) => {
                return Err(MoveError::ReadFailed {
                    path: old.to_string(),
                    source: None,
                });
            }
            Err(e) => {
                return Err(MoveError::ReadFailed {
                    path: old.to_string(),
                    source: Some(e),
                });
            }
        };

        info!(old, new, "Writing to new path");
        store.write(new, &value).map_err(|source| MoveError::WriteFailed {
            path: new.to_string(),
            moved: report.len(),
            source,
        })?;

        info!(old, new, "Deleting old path");
        store.delete(old).map_err(|source| MoveError::DeleteFailed {
            old: old.to_string(),
            new: new.to_string(),
            source,
        })?;

        debug!(old, new, done = report.len() + 1, total = mapping.len(), "Entry moved");
        report.moved.push((old.to_string(), new.to_string()));
    }

    Ok(report)
}
