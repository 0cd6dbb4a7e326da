//! Relocation engine: resolve -> map -> execute.
//!
//! Every stage returns a `MoveError` instead of stopping the process, so callers
//! (the CLI, tests) decide how to report a halt.

pub mod execute;
pub mod mapping;
pub mod prompt;
pub mod resolve;

pub use execute::{MoveReport, execute_moves};
pub use mapping::{PathMapping, Rule, map_paths};
pub use prompt::{AmbiguityPrompt, Choice, TerminalPrompt};
pub use resolve::{Resolution, resolve_leaves};

use tracing::{debug, info};

use crate::errors::MoveError;
use crate::store::SecretStore;

/// A path is a directory reference iff it ends with `/`.
#[inline]
pub fn is_dir_ref(path: &str) -> bool {
    path.ends_with('/')
}

/// Last path segment, ignoring a trailing `/`.
pub fn basename(path: &str) -> &str {
    let trimmed = path.strip_suffix('/').unwrap_or(path);
    trimmed.rsplit('/').next().unwrap_or(trimmed)
}

/// Reject invocations that can never succeed, before the store is touched.
pub fn check_invocation(source: &str, destination: &str) -> Result<(), MoveError> {
    for (which, path) in [("source", source), ("destination", destination)] {
        if path.is_empty() {
            return Err(MoveError::InvalidPath {
                which,
                reason: "path is empty".into(),
            });
        }
        if path.contains("//") {
            return Err(MoveError::InvalidPath {
                which,
                reason: format!("'{path}' contains an empty segment"),
            });
        }
    }
    if source == destination {
        return Err(MoveError::IdenticalPaths(source.to_string()));
    }
    Ok(())
}

/// Plan the move without touching anything: resolve the source and compute the mapping.
pub fn plan<S, P>(store: &S, prompt: &mut P, source: &str, destination: &str) -> Result<PathMapping, MoveError>
where
    S: SecretStore + ?Sized,
    P: AmbiguityPrompt + ?Sized,
{
    check_invocation(source, destination)?;
    let resolution = resolve_leaves(store, prompt, source)?;
    let mapping = map_paths(&resolution.leaves, &resolution.source, destination)?;
    debug!(
        source = %resolution.source,
        destination,
        rule = ?Rule::select(&resolution.source, destination),
        entries = mapping.len(),
        "Planned move"
    );
    Ok(mapping)
}

/// One-shot relocation of `source` to `destination`.
pub fn relocate<S, P>(store: &S, prompt: &mut P, source: &str, destination: &str) -> Result<MoveReport, MoveError>
where
    S: SecretStore + ?Sized,
    P: AmbiguityPrompt + ?Sized,
{
    let mapping = plan(store, prompt, source, destination)?;
    info!(source, destination, entries = mapping.len(), "Moving secrets");
    execute_moves(store, &mapping)
}
