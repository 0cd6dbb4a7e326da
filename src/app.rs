//! Application orchestrator.
//! Loads layered config, initializes logging, installs the interrupt handler, builds
//! the Vault client and runs the relocation.

use anyhow::{Context, Result};
use std::sync::{Arc, Mutex};
use tracing::{debug, error, info, warn};

use vault_kv_mv::cli::Args;
use vault_kv_mv::config::{self, CONFIG_ENV, create_template_config, load_layered};
use vault_kv_mv::output as out;
use vault_kv_mv::{MoveError, TerminalPrompt, VaultClient, check_invocation, default_config_path, relocate};

use crate::logging::init_tracing;

/// Run the CLI application.
pub fn run(args: Args) -> Result<()> {
    // Handled before logging init
    if args.print_config {
        print_config_location();
        return Ok(());
    }
    if args.init_config {
        let path = default_config_path()?;
        create_template_config(&path)?;
        out::print_success(&format!("A template vault-kv-mv config was written to: {}", path.display()));
        out::print_info("The token is never read from this file; use VAULT_TOKEN or `vault login`.");
        return Ok(());
    }

    let (source, destination) = args
        .paths()
        .context("both SOURCE_PATH and DESTINATION_PATH are required")?;

    let loaded = load_layered()?;
    let mut cfg = loaded.config;
    args.apply_overrides(&mut cfg);

    // Initialize logging and keep the guard so the interrupt handler can flush it
    let guard_opt = init_tracing(&cfg.log_level, cfg.log_file.as_deref(), args.json).map_err(|e| {
        out::print_error(&format!("Failed to initialize logging: {e}"));
        e
    })?;
    let guard_slot = Arc::new(Mutex::new(guard_opt));
    {
        let guard_slot = Arc::clone(&guard_slot);
        let installed = ctrlc::set_handler(move || {
            out::print_warn(
                "Interrupted; the entry being moved may exist at both its old and new path. Re-run the same command to finish.",
            );
            if let Ok(mut g) = guard_slot.lock() {
                let _ = g.take();
            }
            std::process::exit(130);
        });
        if let Err(e) = installed {
            warn!(error = %e, "Failed to install interrupt handler");
        }
    }

    if let Some(file) = &loaded.source_file {
        debug!(path = %file.display(), "Using config file");
    }
    debug!(?cfg, %source, %destination, "Starting vault-kv-mv");

    let result = (|| -> Result<()> {
        // Identical paths fail before any credentials are needed
        check_invocation(&source, &destination).inspect_err(log_move_error)?;
        cfg.validate()?;
        let client = VaultClient::new(cfg.vault_settings()).context("build Vault client")?;
        let mut prompt = TerminalPrompt::stdio();

        let report = relocate(&client, &mut prompt, &source, &destination).inspect_err(log_move_error)?;
        for (old, new) in &report.moved {
            out::print_user(&format!("Moved {old} -> {new}"));
        }
        info!(entries = report.len(), "Move completed");
        if report.is_empty() {
            out::print_info("Nothing to move");
        } else {
            out::print_success(&format!("Moved {} secret(s)", report.len()));
        }
        Ok(())
    })();

    // Ensure logs are flushed before exit
    if let Ok(mut g) = guard_slot.lock() {
        let _ = g.take();
    }

    result
}

fn log_move_error(e: &MoveError) {
    let code = e.code();
    let kind = e.kind();
    match e {
        MoveError::WriteFailed { path, moved, .. } => {
            error!(code, kind, %path, moved = *moved, error = %e, "Move halted")
        }
        MoveError::DeleteFailed { old, new, .. } => {
            error!(code, kind, %old, %new, error = %e, "Move halted; old key left behind")
        }
        _ if e.is_mid_migration() => error!(code, kind, error = %e, "Move halted"),
        _ => error!(code, kind, error = %e, "Move refused"),
    }
}

fn print_config_location() {
    if let Ok(cfg_env) = std::env::var(CONFIG_ENV) {
        out::print_info(&format!("Using {CONFIG_ENV} (explicit):\n  {cfg_env}\n"));
        out::print_info(&format!("To override, unset {CONFIG_ENV} or set it to another file."));
        return;
    }
    match default_config_path() {
        Ok(p) => {
            out::print_info(&format!("Default vault-kv-mv config path:\n  {}\n", p.display()));
            if p.exists() {
                out::print_info("A config file already exists at that location.");
            } else {
                out::print_info("No config file exists there yet. Run with --init-config to create a template.");
            }
        }
        Err(e) => out::print_error(&format!("Could not determine a default config path: {e}")),
    }
    if let Some(helper) = config::token_helper_path() {
        out::print_info(&format!("Token fallback (when VAULT_TOKEN is unset): {}", helper.display()));
    }
}
