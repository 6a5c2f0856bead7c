use serde::Serialize;
use std::sync::OnceLock;

static QUIET: OnceLock<bool> = OnceLock::new();

/// Suppress decorative human output (banners, hints) when `BIZMAN_QUIET` is set
pub fn is_quiet() -> bool {
    *QUIET.get_or_init(|| {
        std::env::var("BIZMAN_QUIET")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    })
}

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

/// Envelope printed for every command in JSON mode
#[derive(Debug, Serialize)]
pub struct Envelope<'a, T: Serialize> {
    pub status: &'static str,
    pub command: &'a str,
    pub data: T,
}

pub fn envelope<'a, T: Serialize>(command: &'a str, data: T) -> Envelope<'a, T> {
    Envelope { status: "ok", command, data }
}

/// Print a success envelope in JSON mode. Human mode output is printed by
/// each command itself.
pub fn emit_success<T: Serialize>(mode: OutputMode, command: &str, data: T) -> anyhow::Result<()> {
    if mode == OutputMode::Json {
        println!("{}", serde_json::to_string_pretty(&envelope(command, data))?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_shape() {
        let json = serde_json::to_value(envelope("stats", serde_json::json!({"leads": 2}))).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["command"], "stats");
        assert_eq!(json["data"]["leads"], 2);
    }

    #[test]
    fn test_output_mode() {
        assert!(OutputMode::from_flag(false).is_human());
        assert_eq!(OutputMode::from_flag(true), OutputMode::Json);
    }
}
