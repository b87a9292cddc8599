//! Terminal and file logging for Lightbox.
//!
//! The macros in [`macros`] print colored output to the terminal and mirror
//! everything into an in-memory buffer plus a log file under the app
//! directory. Anything that looks like a credential is redacted before it
//! goes anywhere.

use std::{
    fmt::Write as _,
    io::Write,
    path::PathBuf,
    sync::{
        atomic::{AtomicBool, Ordering},
        LazyLock, Mutex,
    },
};

use regex::Regex;

mod macros;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogType {
    Info,
    Error,
    Point,
}

/// Whether log messages should be printed to the terminal.
/// Disabled while something else owns the terminal (and in tests).
static PRINT_TO_TERMINAL: AtomicBool = AtomicBool::new(true);

static IN_MEMORY_LOG: Mutex<String> = Mutex::new(String::new());

static LOG_FILE: LazyLock<Mutex<Option<(std::fs::File, PathBuf)>>> =
    LazyLock::new(|| Mutex::new(open_log_file()));

static REDACT_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    // "password=...", "token: ...", "Bearer ..." and friends
    Regex::new(r#"(?i)\b(password|passwd|token|secret|bearer)(["']?\s*[:=]?\s*)\S+"#).ok()
});

pub fn is_print() -> bool {
    PRINT_TO_TERMINAL.load(Ordering::Acquire)
}

pub fn set_print(enable: bool) {
    PRINT_TO_TERMINAL.store(enable, Ordering::Release);
}

/// Strip credential-looking substrings from a log message.
pub fn auto_redact(msg: &str) -> String {
    match REDACT_PATTERN.as_ref() {
        Some(pattern) => pattern.replace_all(msg, "$1$2[REDACTED]").into_owned(),
        None => msg.to_owned(),
    }
}

/// Take a snapshot of everything logged so far in this session.
pub fn get_logs() -> String {
    IN_MEMORY_LOG.lock().map(|n| n.clone()).unwrap_or_default()
}

pub fn print_to_memory(msg: &str, kind: LogType) {
    if let Ok(mut log) = IN_MEMORY_LOG.lock() {
        _ = writeln!(log, "{} {msg}", prefix(kind));
    }
}

pub fn print_to_file(msg: &str, kind: LogType) {
    print_to_memory(msg, kind);
    if let Ok(mut guard) = LOG_FILE.lock() {
        if let Some((file, _)) = guard.as_mut() {
            _ = writeln!(file, "{} {msg}", prefix(kind));
        }
    }
}

fn prefix(kind: LogType) -> &'static str {
    match kind {
        LogType::Info => "[info]",
        LogType::Error => "[error]",
        LogType::Point => "-",
    }
}

fn open_log_file() -> Option<(std::fs::File, PathBuf)> {
    let logs_dir = crate::file_utils::get_app_dir().ok()?.join("logs");
    std::fs::create_dir_all(&logs_dir).ok()?;

    let now = chrono::Local::now();
    let path = logs_dir.join(format!("session-{}.log", now.format("%Y-%m-%d-%H%M%S")));
    let file = std::fs::File::create(&path).ok()?;
    Some((file, path))
}
