// Draft field values and the per-wizard field schema.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Descriptor yielded by the file-selection affordance. No upload happens;
/// only the name and size travel through the wizard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRef {
    pub name: String,
    pub size_bytes: u64,
}

impl FileRef {
    pub fn new(name: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            name: name.into(),
            size_bytes,
        }
    }

    /// Build a descriptor from a local path using file metadata.
    pub fn from_path(path: &std::path::Path) -> std::io::Result<Self> {
        let meta = std::fs::metadata(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self {
            name,
            size_bytes: meta.len(),
        })
    }

    /// Human-readable size, e.g. "1.2 GB".
    pub fn display_size(&self) -> String {
        const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
        let mut size = self.size_bytes as f64;
        let mut unit = 0;
        while size >= 1024.0 && unit < UNITS.len() - 1 {
            size /= 1024.0;
            unit += 1;
        }
        if unit == 0 {
            format!("{} B", self.size_bytes)
        } else {
            format!("{:.1} {}", size, UNITS[unit])
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Flag(bool),
    File(FileRef),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            FieldValue::Flag(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_file(&self) -> Option<&FileRef> {
        match self {
            FieldValue::File(f) => Some(f),
            _ => None,
        }
    }

    /// A value counts as present when it carries something a user entered.
    /// Blank text is treated the same as an absent key.
    pub fn is_present(&self) -> bool {
        match self {
            FieldValue::Text(s) => !s.trim().is_empty(),
            _ => true,
        }
    }

    fn variant_name(&self) -> &'static str {
        match self {
            FieldValue::Text(_) => "text",
            FieldValue::Number(_) => "number",
            FieldValue::Flag(_) => "flag",
            FieldValue::File(_) => "file",
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => write!(f, "{}", s),
            FieldValue::Number(n) => write!(f, "{}", n),
            FieldValue::Flag(b) => write!(f, "{}", if *b { "yes" } else { "no" }),
            FieldValue::File(file) => write!(f, "{} ({})", file.name, file.display_size()),
        }
    }
}

pub type Draft = HashMap<String, FieldValue>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    Text,
    /// Text that must be masked on screen and in logs.
    Secret,
    Number { min: f64, max: f64, step: f64, default: f64 },
    Flag { default: bool },
    File,
    Choice { options: &'static [&'static str] },
}

impl FieldKind {
    pub fn accepts(&self, value: &FieldValue) -> bool {
        matches!(
            (self, value),
            (FieldKind::Text | FieldKind::Secret, FieldValue::Text(_))
                | (FieldKind::Number { .. }, FieldValue::Number(_))
                | (FieldKind::Flag { .. }, FieldValue::Flag(_))
                | (FieldKind::File, FieldValue::File(_))
                | (FieldKind::Choice { .. }, FieldValue::Text(_))
        )
    }

    pub fn expected(&self) -> &'static str {
        match self {
            FieldKind::Text | FieldKind::Secret | FieldKind::Choice { .. } => "text",
            FieldKind::Number { .. } => "number",
            FieldKind::Flag { .. } => "flag",
            FieldKind::File => "file",
        }
    }

    pub fn default_value(&self) -> Option<FieldValue> {
        match self {
            FieldKind::Number { default, .. } => Some(FieldValue::Number(*default)),
            FieldKind::Flag { default } => Some(FieldValue::Flag(*default)),
            _ => None,
        }
    }
}

/// One declared field of a wizard.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    /// 1-based step the field is rendered on.
    pub step: usize,
    pub kind: FieldKind,
    /// Checked only at submission time.
    pub required: bool,
    pub placeholder: &'static str,
}

impl FieldSpec {
    pub const fn optional(
        name: &'static str,
        label: &'static str,
        step: usize,
        kind: FieldKind,
        placeholder: &'static str,
    ) -> Self {
        Self {
            name,
            label,
            step,
            kind,
            required: false,
            placeholder,
        }
    }

    pub const fn required(
        name: &'static str,
        label: &'static str,
        step: usize,
        kind: FieldKind,
        placeholder: &'static str,
    ) -> Self {
        Self {
            name,
            label,
            step,
            kind,
            required: true,
            placeholder,
        }
    }

    pub fn is_secret(&self) -> bool {
        matches!(self.kind, FieldKind::Secret)
    }
}

pub(crate) fn describe_mismatch(spec: &FieldSpec, value: &FieldValue) -> String {
    format!(
        "field '{}' expects a {} value, got {}",
        spec.name,
        spec.kind.expected(),
        value.variant_name()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_text_is_not_present() {
        assert!(!FieldValue::text("   ").is_present());
        assert!(FieldValue::text("Demo").is_present());
        assert!(FieldValue::Number(0.0).is_present());
    }

    #[test]
    fn kind_accepts_matching_variant_only() {
        let number = FieldKind::Number {
            min: 1.0,
            max: 10.0,
            step: 1.0,
            default: 3.0,
        };
        assert!(number.accepts(&FieldValue::Number(4.0)));
        assert!(!number.accepts(&FieldValue::text("4")));
        assert!(FieldKind::Secret.accepts(&FieldValue::text("key")));
        assert!(!FieldKind::File.accepts(&FieldValue::Flag(true)));
    }

    #[test]
    fn file_size_is_humanized() {
        assert_eq!(FileRef::new("a.csv", 512).display_size(), "512 B");
        assert_eq!(FileRef::new("a.csv", 1536).display_size(), "1.5 KB");
        let big = FileRef::new("custom_dataset.csv", 1_288_490_189);
        assert_eq!(big.display_size(), "1.2 GB");
    }

    #[test]
    fn file_ref_from_path_reads_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("train.jsonl");
        std::fs::write(&path, b"{\"prompt\":\"hi\"}\n").unwrap();

        let file = FileRef::from_path(&path).unwrap();
        assert_eq!(file.name, "train.jsonl");
        assert_eq!(file.size_bytes, 16);
    }
}
