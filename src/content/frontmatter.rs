//! Front-matter parsing

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use indexmap::IndexMap;
use serde::Deserialize;
use serde_yaml::Value;

/// Front-matter data from a content file, keys kept in source order
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct FrontMatter(IndexMap<String, Value>);

/// A content file split into its metadata block and the remaining body
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedEntry {
    pub front_matter: FrontMatter,
    pub body: String,
    /// A metadata block was present but could not be parsed
    pub degraded: bool,
}

impl ParsedEntry {
    /// Split raw file text into front-matter and body.
    ///
    /// Never fails: a malformed block yields an empty mapping and the whole
    /// text as body.
    pub fn parse(content: &str) -> Self {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        let trimmed = content.trim_start();

        let parsed = if trimmed.starts_with("---") {
            parse_yaml(trimmed)
        } else if trimmed.starts_with(";;;") {
            parse_json(trimmed)
        } else {
            Split::None
        };

        match parsed {
            Split::Parsed(front_matter, body) => Self {
                front_matter,
                body: body.to_string(),
                degraded: false,
            },
            Split::None => Self {
                body: content.to_string(),
                ..Default::default()
            },
            Split::Malformed(reason) => {
                tracing::warn!(
                    "Failed to parse front-matter, treating as content: {}",
                    reason
                );
                Self {
                    body: content.to_string(),
                    degraded: true,
                    ..Default::default()
                }
            }
        }
    }
}

enum Split<'a> {
    Parsed(FrontMatter, &'a str),
    None,
    Malformed(String),
}

fn parse_yaml(content: &str) -> Split<'_> {
    let rest = &content[3..]; // Skip opening ---
    let rest = rest.trim_start_matches(['\n', '\r']);

    // `---\n---` is an empty block
    if let Some(remaining) = rest.strip_prefix("---") {
        return Split::Parsed(
            FrontMatter::default(),
            remaining.trim_start_matches(['\n', '\r']),
        );
    }

    let Some(end_pos) = rest.find("\n---") else {
        return Split::None;
    };

    let yaml_content = &rest[..end_pos];
    let remaining = &rest[end_pos + 4..]; // Skip \n---
    let remaining = remaining.trim_start_matches(['\n', '\r']);

    if yaml_content.trim().is_empty() {
        return Split::Parsed(FrontMatter::default(), remaining);
    }

    // A `---` thematic break followed by prose is not metadata
    if !looks_like_yaml(yaml_content) {
        return Split::None;
    }

    match serde_yaml::from_str::<FrontMatter>(yaml_content) {
        Ok(fm) => Split::Parsed(fm, remaining),
        Err(e) => Split::Malformed(e.to_string()),
    }
}

fn parse_json(content: &str) -> Split<'_> {
    let rest = &content[3..]; // Skip opening ;;;
    let Some(end_pos) = rest.find(";;;") else {
        return Split::None;
    };

    let json_content = rest[..end_pos].trim();
    let remaining = rest[end_pos + 3..].trim_start_matches(['\n', '\r']);

    // The block body may be a bare list of members or a full object
    let object = if json_content.starts_with('{') {
        json_content.to_string()
    } else {
        format!("{{{}}}", json_content)
    };

    match serde_json::from_str::<FrontMatter>(&object) {
        Ok(fm) => Split::Parsed(fm, remaining),
        Err(e) => Split::Malformed(e.to_string()),
    }
}

/// Valid YAML front-matter has at least one `key: value` line
fn looks_like_yaml(block: &str) -> bool {
    block.lines().any(|line| {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return false;
        }
        let Some(colon_pos) = trimmed.find(':') else {
            return false;
        };
        let key = &trimmed[..colon_pos];
        let is_valid_key = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
            && !matches!(key, "http" | "https" | "ftp");
        let after_colon = &trimmed[colon_pos + 1..];
        is_valid_key && (after_colon.is_empty() || after_colon.starts_with(' '))
    })
}

impl FrontMatter {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Read a scalar field as text. Empty strings count as absent.
    pub fn text(&self, key: &str) -> Option<String> {
        let text = match self.0.get(key)? {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            _ => return None,
        };
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }

    /// Parse the `date` field into a UTC calendar date
    pub fn date(&self) -> Option<NaiveDate> {
        self.text("date").and_then(|s| parse_date_string(&s))
    }
}

/// Parse a date string in various formats into its UTC calendar date.
///
/// Timestamps without an offset are taken as UTC, as YAML does.
fn parse_date_string(s: &str) -> Option<NaiveDate> {
    let s = s.trim();

    // `Z`, with or without a leading space, is a zero offset
    let zoned = match s.strip_suffix('Z') {
        Some(rest) => format!("{}+00:00", rest.trim_end()),
        None => s.to_string(),
    };
    let zoned_formats = [
        "%Y-%m-%dT%H:%M:%S%.f%:z",
        "%Y-%m-%d %H:%M:%S%.f%:z",
        "%Y-%m-%d %H:%M:%S%.f %:z",
        "%Y-%m-%dT%H:%M:%S%.f%z",
        "%Y-%m-%d %H:%M:%S%.f %z",
    ];
    for fmt in zoned_formats {
        if let Ok(dt) = DateTime::parse_from_str(&zoned, fmt) {
            return Some(dt.with_timezone(&Utc).date_naive());
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(&zoned) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }

    let datetime_formats = [
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M",
        "%Y-%m-%dT%H:%M:%S%.f",
    ];
    for fmt in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }

    ["%Y-%m-%d", "%Y/%m/%d"]
        .into_iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}
