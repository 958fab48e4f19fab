use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

static COLOR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9a-fA-F]{6}$").unwrap());

/// A single task record as served by the task API.
///
/// Field names follow the wire format so a cached snapshot written by one
/// run deserializes unchanged in the next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Short name, the field the search matches against.
    #[serde(default)]
    pub task: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Six hex digits, optionally wrapped in punctuation (`#aabbcc`).
    #[serde(rename = "colorCode", default)]
    pub color_code: String,
}

impl Task {
    /// Decode a task from a loosely typed JSON value.
    ///
    /// Never fails: a missing or non-string field decodes as `""`, so one
    /// malformed record degrades field-by-field instead of sinking the
    /// whole listing.
    pub fn from_json(value: &Value) -> Self {
        let field = |key: &str| {
            value
                .get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };

        Self {
            task: field("task"),
            title: field("title"),
            description: field("description"),
            color_code: field("colorCode"),
        }
    }

    /// Parse the color code into an RGB triple.
    ///
    /// Surrounding punctuation is stripped; anything that is not exactly
    /// six hex digits after that yields `None`.
    pub fn color_rgb(&self) -> Option<(u8, u8, u8)> {
        let hex = self
            .color_code
            .trim_matches(|c: char| !c.is_ascii_alphanumeric());
        if !COLOR_RE.is_match(hex) {
            return None;
        }
        let rgb = u32::from_str_radix(hex, 16).ok()?;
        Some((
            ((rgb >> 16) & 0xff) as u8,
            ((rgb >> 8) & 0xff) as u8,
            (rgb & 0xff) as u8,
        ))
    }
}
