use crate::media::MediaKind;
use crate::output::is_quiet;
use crate::ui::{theme, Icons};
use owo_colors::OwoColorize;

/// Banner line; dropped under `FILEVAULT_QUIET`
pub fn header(text: &str) {
    if is_quiet() {
        return;
    }
    println!("{} {}", Icons::PACKAGE, text.style(theme().header.clone()));
}

pub fn status(icon: &str, label: &str, value: &str) {
    println!("{} {}: {}", icon, label.style(theme().dim.clone()), value);
}

pub fn success(label: &str) {
    println!("{} {}", Icons::CHECK, label.style(theme().success.clone()));
}

pub fn error(label: &str) {
    eprintln!("{} {}", Icons::CROSS, label.style(theme().error.clone()));
}

pub fn warn(label: &str) {
    eprintln!("{} {}", Icons::WARN, label.style(theme().warn.clone()));
}

/// Hint line; dropped under `FILEVAULT_QUIET`
pub fn info(label: &str, value: &str) {
    if is_quiet() {
        return;
    }
    println!(
        "{} {}: {}",
        Icons::INFO.style(theme().info.clone()),
        label.style(theme().dim.clone()),
        value
    );
}

/// Section rule; dropped under `FILEVAULT_QUIET`
pub fn section(title: &str) {
    if is_quiet() {
        return;
    }
    println!();
    println!("━{}━", title.style(theme().header.clone()));
}

pub fn muted(text: &str) -> String {
    text.style(theme().muted.clone()).to_string()
}

pub fn file_deleted(id: i64) {
    println!(
        "{} {}",
        Icons::DEL.style(theme().error.clone()),
        format!("#{}", id).style(theme().accent.clone())
    );
}

pub fn summary_row(label: &str, value: &str) {
    println!("  {} {}", label.style(theme().dim.clone()), value);
}

pub fn media_icon(kind: MediaKind) -> &'static str {
    match kind {
        MediaKind::Image => Icons::IMAGE,
        MediaKind::Video => Icons::VIDEO,
        MediaKind::Audio => Icons::AUDIO,
        MediaKind::Text => Icons::TEXT,
        MediaKind::Other => Icons::FILE,
    }
}

/// Icon plus kind name, colored by kind
pub fn media_label(kind: MediaKind) -> String {
    format!("{} {}", media_icon(kind), kind.as_str().style(theme().kind(kind)))
}

/// Format a byte count as B, KB or MB with one decimal
pub fn human_bytes(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * 1024;
    if size < KB {
        format!("{} B", size)
    } else if size < MB {
        format!("{:.1} KB", size as f64 / KB as f64)
    } else {
        format!("{:.1} MB", size as f64 / MB as f64)
    }
}
