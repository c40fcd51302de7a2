//! Toast rendering for terminal output.

use crate::domain::toast::{Toast, ToastKind};

const RESET: &str = "\x1b[0m";

const fn color(kind: ToastKind) -> &'static str {
    match kind {
        ToastKind::Success => "\x1b[32m",
        ToastKind::Error => "\x1b[31m",
        ToastKind::Warning => "\x1b[33m",
        ToastKind::Info => "\x1b[36m",
    }
}

/// Formats one toast as `[icon] message`, colored when `ansi` is set.
#[must_use]
pub fn render_toast(toast: &Toast, ansi: bool) -> String {
    let line = format!("[{}] {}", toast.kind.icon(), toast.message);
    if ansi {
        format!("{}{line}{RESET}", color(toast.kind))
    } else {
        line
    }
}
