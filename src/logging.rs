//! Tracing initialization.
//! Builds a subscriber with EnvFilter, supports compact or JSON formats, and optional file logging.
//!
//! Behavior:
//! - Log level is driven by LogLevel (no RUST_LOG override here).
//! - Console logs go to stderr; stdout carries only the "Moved X -> Y" lines.
//! - HTTP client internals are capped at warn so `debug` shows our own requests only.
//! - If `log_file` is provided and passes safety checks, a non-blocking file layer is added.

use anyhow::{Result, anyhow};
use chrono::Local;
use std::fmt as stdfmt;
use std::path::Path;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::fmt as tsfmt;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry;
use tracing_subscriber::util::SubscriberInitExt;

use vault_kv_mv::output as out;
use vault_kv_mv::platform::open_log_file_secure_append;
use vault_kv_mv::{LogLevel, path_has_symlink_ancestor};

/// Human-friendly timestamp formatter (DD/MM/YY HH:MM:SS)
struct LocalHumanTime;
impl FormatTime for LocalHumanTime {
    fn format_time(&self, w: &mut tsfmt::format::Writer<'_>) -> stdfmt::Result {
        write!(w, "{}", Local::now().format("%d/%m/%y %H:%M:%S"))
    }
}

#[inline]
fn to_level_filter(lvl: &LogLevel) -> LevelFilter {
    match lvl {
        LogLevel::Quiet => LevelFilter::ERROR,
        LogLevel::Normal => LevelFilter::INFO,
        LogLevel::Info => LevelFilter::DEBUG,
        LogLevel::Debug => LevelFilter::TRACE,
    }
}

fn env_filter_from_level(level_filter: LevelFilter) -> EnvFilter {
    let level_str = match level_filter {
        LevelFilter::ERROR => "error",
        LevelFilter::WARN => "warn",
        LevelFilter::INFO => "info",
        LevelFilter::DEBUG => "debug",
        LevelFilter::TRACE => "trace",
        _ => "info",
    };
    EnvFilter::new(format!(
        "{level_str},hyper=warn,hyper_util=warn,reqwest=warn,rustls=warn"
    ))
}

/// Open a non-blocking file writer, or None (with a reason on stderr) if the path is
/// unsafe or cannot be opened.
fn maybe_open_non_blocking_writer(path: &Path) -> Option<(NonBlocking, WorkerGuard)> {
    match path_has_symlink_ancestor(path) {
        Ok(true) => {
            eprintln!(
                "Refusing to enable file logging: ancestor of {} is a symlink",
                path.display()
            );
            return None;
        }
        Err(e) => {
            eprintln!("Error checking log path {} for symlinks: {e}", path.display());
            return None;
        }
        Ok(false) => {}
    }

    match open_log_file_secure_append(path) {
        Ok(file) => Some(tracing_appender::non_blocking(file)),
        Err(e) => {
            eprintln!("Failed to open log file {}: {e}", path.display());
            None
        }
    }
}

/// Initialize tracing based on LogLevel and format. Returns the WorkerGuard of the
/// file appender, if any; it must be held until shutdown to flush logs.
pub fn init_tracing(lvl: &LogLevel, log_file: Option<&Path>, json: bool) -> Result<Option<WorkerGuard>> {
    let env_filter = env_filter_from_level(to_level_filter(lvl));

    let file = match log_file {
        Some(path) => {
            let opened = maybe_open_non_blocking_writer(path);
            if opened.is_none() {
                out::print_warn(&format!(
                    "Requested file logging to '{}' was not enabled. Check that the parent directory is writable and that no ancestor is a symlink. Logs will continue to stderr.",
                    path.display()
                ));
            }
            opened
        }
        None => None,
    };
    let (file_writer, guard) = match file {
        Some((w, g)) => (Some(w), Some(g)),
        None => (None, None),
    };

    // Each sink gets either a JSON or a compact layer; the unused Option stays None.
    let console_json = json.then(|| {
        tsfmt::layer()
            .event_format(tsfmt::format().json())
            .with_timer(LocalHumanTime)
            .with_target(true)
            .with_writer(std::io::stderr)
    });
    let console_compact = (!json).then(|| {
        tsfmt::layer()
            .with_timer(LocalHumanTime)
            .with_target(false)
            .compact()
            .with_writer(std::io::stderr)
    });
    let file_json = file_writer.clone().filter(|_| json).map(|w| {
        tsfmt::layer()
            .event_format(tsfmt::format().json())
            .with_timer(LocalHumanTime)
            .with_target(true)
            .with_thread_ids(true)
            .with_writer(w)
    });
    let file_compact = file_writer.filter(|_| !json).map(|w| {
        tsfmt::layer()
            .with_timer(LocalHumanTime)
            .with_target(true)
            .with_thread_ids(true)
            .with_ansi(false)
            .compact()
            .with_writer(w)
    });

    registry()
        .with(env_filter)
        .with(console_json)
        .with(console_compact)
        .with(file_json)
        .with(file_compact)
        .try_init()
        .map_err(|e| anyhow!("install tracing subscriber: {e}"))?;

    Ok(guard)
}
