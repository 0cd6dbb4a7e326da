//! Operator-facing messages.
//! Colored prefixes when the target stream is a TTY, plain text otherwise.

use owo_colors::OwoColorize;

#[derive(Clone, Copy)]
enum Stream {
    Stdout,
    Stderr,
}

fn is_tty(stream: Stream) -> bool {
    match stream {
        Stream::Stdout => atty::is(atty::Stream::Stdout),
        Stream::Stderr => atty::is(atty::Stream::Stderr),
    }
}

fn emit(stream: Stream, label: &str, colored: impl std::fmt::Display, msg: &str) {
    let line = if is_tty(stream) {
        format!("{colored} {msg}")
    } else {
        format!("{label} {msg}")
    };
    match stream {
        Stream::Stdout => println!("{line}"),
        Stream::Stderr => eprintln!("{line}"),
    }
}

pub fn print_info(msg: &str) {
    emit(Stream::Stdout, "info:", "info:".cyan().bold(), msg);
}

pub fn print_warn(msg: &str) {
    emit(Stream::Stderr, "warn:", "warn:".yellow().bold(), msg);
}

pub fn print_error(msg: &str) {
    emit(Stream::Stderr, "error:", "error:".red().bold(), msg);
}

pub fn print_success(msg: &str) {
    emit(Stream::Stdout, "ok:", "ok:".green().bold(), msg);
}

/// Print a plain line (no prefix) for outputs users may script against,
/// such as "Moved X -> Y".
pub fn print_user(msg: &str) {
    println!("{msg}");
}
