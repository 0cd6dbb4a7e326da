//! Leaf discovery.
//! Turns the operator's source path into the ordered list of concrete keys it denotes.
//!
//! - `path/` is a directory reference: its listing is expanded depth-first, in the
//!   order the store reports children.
//! - `path` is a single key. When the store also has a `path/` directory the operator
//!   is asked which one is meant.
//! - Nothing is written here; only `list` and `read` are issued.

use tracing::{debug, warn};

use crate::errors::MoveError;
use crate::store::SecretStore;

use super::is_dir_ref;
use super::prompt::{AmbiguityPrompt, Choice};

/// Deeper listings than this are treated as self-referential.
pub const MAX_LISTING_DEPTH: usize = 128;

/// Result of resolving a source path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Source path as the mapper must see it. Equals the operator's input, except that
    /// choosing "dir" for an ambiguous key turns `path` into `path/`.
    pub source: String,
    pub leaves: Vec<String>,
}

pub fn resolve_leaves<S, P>(store: &S, prompt: &mut P, source: &str) -> Result<Resolution, MoveError>
where
    S: SecretStore + ?Sized,
    P: AmbiguityPrompt + ?Sized,
{
    if is_dir_ref(source) {
        let leaves = collect_dir(store, source)?;
        debug!(source, count = leaves.len(), "Resolved directory source");
        return Ok(Resolution {
            source: source.to_string(),
            leaves,
        });
    }

    let value = store.read(source).map_err(|e| MoveError::LookupFailed {
        path: source.to_string(),
        source: e,
    })?;

    let as_dir = format!("{source}/");
    let children = match store.list(&as_dir) {
        Ok(children) => children.filter(|c| !c.is_empty()),
        // A key we can read is still movable without list permission on `S/`, but
        // whether `S/` also holds secrets is unknown and must be stated.
        Err(e) if value.is_some() => {
            warn!(
                key = source,
                dir = %as_dir,
                error = %e,
                "Could not check whether {as_dir} is also a directory; moving only the key {source}. Anything under {as_dir} stays where it is"
            );
            None
        }
        Err(e) => return Err(MoveError::ListFailed(as_dir, Some(e))),
    };

    match (value.is_some(), children.is_some()) {
        (true, false) => Ok(Resolution {
            source: source.to_string(),
            leaves: vec![source.to_string()],
        }),
        (true, true) => match prompt.choose(source)? {
            Choice::Key => {
                debug!(source, "Ambiguous source resolved as key");
                Ok(Resolution {
                    source: source.to_string(),
                    leaves: vec![source.to_string()],
                })
            }
            Choice::Dir => {
                debug!(source, "Ambiguous source resolved as directory");
                let leaves = collect_dir(store, &as_dir)?;
                Ok(Resolution {
                    source: as_dir,
                    leaves,
                })
            }
        },
        (false, true) => Err(MoveError::SourceIsDirectory(source.to_string())),
        (false, false) => Err(MoveError::SourceNotFound(source.to_string())),
    }
}

/// Expand a directory reference into every leaf beneath it.
fn collect_dir<S: SecretStore + ?Sized>(store: &S, dir: &str) -> Result<Vec<String>, MoveError> {
    let mut leaves = Vec::new();
    walk(store, dir, 0, &mut leaves)?;
    Ok(leaves)
}

fn walk<S: SecretStore + ?Sized>(
    store: &S,
    dir: &str,
    depth: usize,
    leaves: &mut Vec<String>,
) -> Result<(), MoveError> {
    if depth >= MAX_LISTING_DEPTH {
        return Err(MoveError::ListingTooDeep {
            dir: dir.to_string(),
            depth,
        });
    }

    let children = match store.list(dir) {
        Ok(Some(children)) if !children.is_empty() => children,
        Ok(_) => return Err(MoveError::ListFailed(dir.to_string(), None)),
        Err(e) => return Err(MoveError::ListFailed(dir.to_string(), Some(e))),
    };

    for child in children {
        let name = child.strip_suffix('/').unwrap_or(&child);
        if name.is_empty() || name.starts_with('/') {
            return Err(MoveError::MalformedListing {
                dir: dir.to_string(),
                reason: format!("child name '{child}'"),
            });
        }

        if child.ends_with('/') {
            walk(store, &format!("{dir}{name}/"), depth + 1, leaves)?;
        } else {
            leaves.push(format!("{dir}{name}"));
        }
    }
    Ok(())
}
