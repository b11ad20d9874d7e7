// Log line shaping for the fern dispatch: `[PHASE: x] [STEP: y]` tags are
// lifted out of the message into fields, then written as JSON or text.

use log::Level;
use serde::Serialize;

/// Keep the first and last four chars of a secret; short values are fully hidden.
pub fn mask_sensitive(input: &str) -> String {
    const VISIBLE: usize = 4;
    let len = input.chars().count();
    if len <= VISIBLE * 2 {
        return "***".to_string();
    }
    let head: String = input.chars().take(VISIBLE).collect();
    let tail: String = input.chars().skip(len - VISIBLE).collect();
    format!("{}...{}", head, tail)
}

/// Remove the first `[TAG: value]` marker, returning its value and the rest.
fn take_tag(message: &str, tag: &str) -> (Option<String>, String) {
    let open = format!("[{}:", tag);
    let found = message.find(&open).and_then(|start| {
        message[start..]
            .find(']')
            .map(|close| (start, start + close))
    });
    match found {
        Some((start, end)) => {
            let value = message[start + open.len()..end].trim().to_string();
            let rest = format!("{} {}", &message[..start], &message[end + 1..]);
            (Some(value), rest.trim().to_string())
        }
        None => (None, message.to_string()),
    }
}

/// One formatted record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogLine<'a> {
    pub timestamp: &'a str,
    pub level: &'static str,
    pub target: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<String>,
    pub message: String,
}

impl<'a> LogLine<'a> {
    pub fn new(timestamp: &'a str, level: Level, target: &'a str, raw: &str) -> Self {
        let (phase, rest) = take_tag(raw, "PHASE");
        let (step, message) = take_tag(&rest, "STEP");
        Self {
            timestamp,
            level: level.as_str(),
            target,
            phase,
            step,
            message,
        }
    }

    /// Single-line JSON object for the `.log` file.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }

    /// `[ts] [LEVEL] [PHASE: p] [STEP: s] [target] message`
    pub fn to_text(&self) -> String {
        let mut parts = vec![format!("[{}]", self.timestamp), format!("[{}]", self.level)];
        if let Some(phase) = &self.phase {
            parts.push(format!("[PHASE: {}]", phase));
        }
        if let Some(step) = &self.step {
            parts.push(format!("[STEP: {}]", step));
        }
        parts.push(format!("[{}]", self.target));
        parts.push(self.message.clone());
        parts.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_secrets_are_fully_hidden() {
        assert_eq!(mask_sensitive(""), "***");
        assert_eq!(mask_sensitive("12345678"), "***");
    }

    #[test]
    fn long_secrets_keep_both_ends() {
        assert_eq!(mask_sensitive("abcdefghijklmnop"), "abcd...mnop");
        // Byte slicing would panic here.
        let masked = mask_sensitive("ключ-секрет-значение");
        assert_eq!(masked, "ключ...ение");
    }

    #[test]
    fn tags_become_fields() {
        let line = LogLine::new(
            "t",
            Level::Info,
            "finetun_dashboard",
            "[PHASE: wizard] [STEP: submit] correlation_id=abc",
        );
        assert_eq!(line.phase.as_deref(), Some("wizard"));
        assert_eq!(line.step.as_deref(), Some("submit"));
        assert_eq!(line.message, "correlation_id=abc");
    }

    #[test]
    fn untagged_message_passes_through() {
        let line = LogLine::new("t", Level::Debug, "x", "plain message");
        assert!(line.phase.is_none() && line.step.is_none());
        assert_eq!(line.message, "plain message");
    }

    #[test]
    fn json_omits_missing_tags() {
        let line = LogLine::new("2026-01-01T00:00:00Z", Level::Info, "tui", "[PHASE: wizard] hello");
        let v: serde_json::Value = serde_json::from_str(&line.to_json()).unwrap();
        assert_eq!(v["level"], "INFO");
        assert_eq!(v["phase"], "wizard");
        assert_eq!(v["message"], "hello");
        assert!(v.get("step").is_none());
    }

    #[test]
    fn text_orders_tags_before_target() {
        let line = LogLine::new(
            "2026-01-01 00:00:00.000",
            Level::Warn,
            "tui",
            "[STEP: toast] [PHASE: notify] toast",
        );
        assert_eq!(
            line.to_text(),
            "[2026-01-01 00:00:00.000] [WARN] [PHASE: notify] [STEP: toast] [tui] toast"
        );
    }
}
