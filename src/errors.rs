//! Typed error definitions for vault_kv_mv.
//! Provides a small set of well-known failure modes for better logs, exit codes and tests.

use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum MoveError {
    #[error("Source ({0}) and destination are identical. Nothing to do")]
    IdenticalPaths(String),

    #[error("Invalid {which} path: {reason}")]
    InvalidPath { which: &'static str, reason: String },

    #[error("Failed to list {0}. Does it exist?")]
    ListFailed(String, #[source] Option<StoreError>),

    #[error("Source path not found: {0}")]
    SourceNotFound(String),

    #[error("Source path {0} is a directory; use '{0}/' to move its contents")]
    SourceIsDirectory(String),

    #[error("Failed to look up {path}")]
    LookupFailed {
        path: String,
        #[source]
        source: StoreError,
    },

    #[error("Listing of {dir} is nested {depth} levels deep; refusing to follow a self-referential listing")]
    ListingTooDeep { dir: String, depth: usize },

    #[error("Malformed listing under {dir}: {reason}")]
    MalformedListing { dir: String, reason: String },

    #[error("Could not decide how to treat {path}: {reason}")]
    PromptFailed { path: String, reason: String },

    #[error("Leaf {leaf} does not live under source {source_path}")]
    LeafOutsideSource { leaf: String, source_path: String },

    #[error("Both {first} and {second} would be moved to {dest}")]
    DestinationCollision {
        first: String,
        second: String,
        dest: String,
    },

    #[error("Moving {old} to {new} would overwrite {new} before it has been moved itself")]
    OverlappingPaths { old: String, new: String },

    #[error("Could not read secret {path}. Does it exist?")]
    ReadFailed {
        path: String,
        #[source]
        source: Option<StoreError>,
    },

    #[error("Failed to write {path}. Try again after fixing the problem ({moved} already moved)")]
    WriteFailed {
        path: String,
        moved: usize,
        #[source]
        source: StoreError,
    },

    #[error(
        "Failed to delete old key {old}; its data is already at {new}. You will need to manually delete this key after fixing the problem"
    )]
    DeleteFailed {
        old: String,
        new: String,
        #[source]
        source: StoreError,
    },
}

impl MoveError {
    /// Process exit code for this failure class.
    pub fn code(&self) -> u8 {
        match self {
            MoveError::IdenticalPaths(_) | MoveError::InvalidPath { .. } => 2,
            MoveError::ListFailed(..)
            | MoveError::SourceNotFound(_)
            | MoveError::SourceIsDirectory(_)
            | MoveError::LookupFailed { .. }
            | MoveError::ListingTooDeep { .. }
            | MoveError::MalformedListing { .. }
            | MoveError::PromptFailed { .. }
            | MoveError::LeafOutsideSource { .. }
            | MoveError::DestinationCollision { .. }
            | MoveError::OverlappingPaths { .. } => 3,
            MoveError::ReadFailed { .. }
            | MoveError::WriteFailed { .. }
            | MoveError::DeleteFailed { .. } => 4,
        }
    }

    /// Short machine-friendly name used as the `kind` field in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            MoveError::IdenticalPaths(_) => "identical_paths",
            MoveError::InvalidPath { .. } => "invalid_path",
            MoveError::ListFailed(..) => "list_failed",
            MoveError::SourceNotFound(_) => "source_not_found",
            MoveError::SourceIsDirectory(_) => "source_is_directory",
            MoveError::LookupFailed { .. } => "lookup_failed",
            MoveError::ListingTooDeep { .. } => "listing_too_deep",
            MoveError::MalformedListing { .. } => "malformed_listing",
            MoveError::PromptFailed { .. } => "prompt_failed",
            MoveError::LeafOutsideSource { .. } => "leaf_outside_source",
            MoveError::DestinationCollision { .. } => "destination_collision",
            MoveError::OverlappingPaths { .. } => "overlapping_paths",
            MoveError::ReadFailed { .. } => "read_failed",
            MoveError::WriteFailed { .. } => "write_failed",
            MoveError::DeleteFailed { .. } => "delete_failed",
        }
    }

    /// True once the store may already have been mutated.
    pub fn is_mid_migration(&self) -> bool {
        self.code() == 4
    }
}
