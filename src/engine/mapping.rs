//! Destination computation.
//! Pure string work: no store access, so every rule is unit-tested here.

use std::collections::HashMap;

use crate::errors::MoveError;

use super::{basename, is_dir_ref};

/// Which renaming convention applies, decided by the trailing `/` on source and destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// `secret/foo` -> `secret/bar`
    Rename,
    /// `secret/foo` -> `secret/bar/` gives `secret/bar/foo`
    IntoDirectory,
    /// `secret/old/` -> `secret/new/`
    DirToDir,
    /// `secret/old/` -> `secret/new` (same result as `DirToDir`)
    DirToPath,
}

impl Rule {
    pub fn select(source: &str, destination: &str) -> Self {
        match (is_dir_ref(source), is_dir_ref(destination)) {
            (false, false) => Rule::Rename,
            (false, true) => Rule::IntoDirectory,
            (true, true) => Rule::DirToDir,
            (true, false) => Rule::DirToPath,
        }
    }
}

/// Ordered old -> new pairs; each old leaf appears once and no two share a destination.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathMapping {
    entries: Vec<(String, String)>,
}

impl PathMapping {
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(o, n)| (o.as_str(), n.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Destination for `old`, if it is part of the mapping.
    pub fn get(&self, old: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(o, _)| o == old)
            .map(|(_, n)| n.as_str())
    }

    pub fn into_inner(self) -> Vec<(String, String)> {
        self.entries
    }
}

/// Compute the destination of a single leaf.
pub fn destination_for(
    rule: Rule,
    leaf: &str,
    source: &str,
    destination: &str,
) -> Result<String, MoveError> {
    match rule {
        Rule::Rename => Ok(destination.to_string()),
        Rule::IntoDirectory => Ok(format!("{destination}{}", basename(source))),
        Rule::DirToDir | Rule::DirToPath => {
            let prefix = source.strip_suffix('/').unwrap_or(source);
            let rest = leaf
                .strip_prefix(prefix)
                .filter(|rest| rest.starts_with('/'))
                .ok_or_else(|| MoveError::LeafOutsideSource {
                    leaf: leaf.to_string(),
                    source_path: source.to_string(),
                })?;
            let base = destination.strip_suffix('/').unwrap_or(destination);
            Ok(format!("{base}{rest}"))
        }
    }
}

/// Map every resolved leaf to its new path.
///
/// Refuses plans that would lose data when executed in order: two leaves landing on
/// the same destination, a leaf mapped onto itself, or a destination that is still
/// waiting to be moved.
pub fn map_paths(leaves: &[String], source: &str, destination: &str) -> Result<PathMapping, MoveError> {
    let rule = Rule::select(source, destination);
    let mut entries = Vec::with_capacity(leaves.len());
    let mut by_dest: HashMap<String, &str> = HashMap::with_capacity(leaves.len());

    for leaf in leaves {
        let new = destination_for(rule, leaf, source, destination)?;
        if new == *leaf {
            return Err(MoveError::IdenticalPaths(new));
        }
        if let Some(first) = by_dest.insert(new.clone(), leaf.as_str()) {
            return Err(MoveError::DestinationCollision {
                first: first.to_string(),
                second: leaf.clone(),
                dest: new,
            });
        }
        entries.push((leaf.clone(), new));
    }

    // A destination that is also a pending source would be overwritten before it moves.
    let position: HashMap<&str, usize> = entries
        .iter()
        .enumerate()
        .map(|(i, (old, _))| (old.as_str(), i))
        .collect();
    for (i, (old, new)) in entries.iter().enumerate() {
        if position.get(new.as_str()).is_some_and(|&j| j > i) {
            return Err(MoveError::OverlappingPaths {
                old: old.clone(),
                new: new.clone(),
            });
        }
    }

    Ok(PathMapping { entries })
}
