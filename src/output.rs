use serde::Serialize;
use std::sync::OnceLock;

static QUIET: OnceLock<bool> = OnceLock::new();

/// Whether `FILEVAULT_QUIET` asks to drop decorative human output
pub fn is_quiet() -> bool {
    *QUIET.get_or_init(|| quiet_from(std::env::var("FILEVAULT_QUIET").ok().as_deref()))
}

fn quiet_from(value: Option<&str>) -> bool {
    value.is_some_and(|v| v == "1" || v.eq_ignore_ascii_case("true"))
}

/// How command results are reported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

impl OutputMode {
    pub fn from_flag(json: bool) -> Self {
        if json { OutputMode::Json } else { OutputMode::Human }
    }

    pub fn is_human(&self) -> bool {
        matches!(self, OutputMode::Human)
    }
}

/// JSON envelope for a successful command
pub fn success_envelope<T: Serialize>(command: &str, data: T) -> serde_json::Result<serde_json::Value> {
    Ok(serde_json::json!({
        "ok": true,
        "command": command,
        "data": serde_json::to_value(data)?,
    }))
}

/// JSON envelope for a failed command
pub fn error_envelope(command: &str, error: &str) -> serde_json::Value {
    serde_json::json!({
        "ok": false,
        "command": command,
        "error": error,
    })
}

/// Print a success envelope in JSON mode; human output is left to the caller
pub fn emit_success<T: Serialize>(mode: OutputMode, command: &str, data: T) -> anyhow::Result<()> {
    if mode == OutputMode::Json {
        println!("{}", serde_json::to_string_pretty(&success_envelope(command, data)?)?);
    }
    Ok(())
}

pub fn emit_error(mode: OutputMode, command: &str, error: &str) {
    match mode {
        OutputMode::Json => {
            let envelope = error_envelope(command, error);
            println!("{}", serde_json::to_string_pretty(&envelope).unwrap_or_default());
        }
        OutputMode::Human => crate::ui::error(error),
    }
}
