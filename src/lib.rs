//! Core library for `vault_kv_mv`.
//!
//! Moves or renames secrets in a Vault KV v1 mount: resolve the source into its
//! leaves, map each leaf to a destination, then copy and delete one entry at a time.
//! Storage is reached through the `SecretStore` trait so the engine runs the same
//! against a live server (`VaultClient`) and in memory (`MemoryStore`).

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod output;
pub mod platform;
pub mod store;

pub use config::types::{Config, LogLevel};
pub use config::{default_config_path, path_has_symlink_ancestor};
pub use engine::{
    AmbiguityPrompt, Choice, MoveReport, PathMapping, TerminalPrompt, check_invocation, plan,
    relocate,
};
pub use errors::MoveError;
pub use store::{MemoryStore, SecretStore, StoreError, ValueBundle, VaultClient, VaultSettings};
