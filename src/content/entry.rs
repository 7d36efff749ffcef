//! Normalized latest-entry record

use serde::Serialize;

/// Summary of the latest entry of a collection, as handed to the site
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LatestEntry {
    pub title: String,

    /// Front-matter description, or the excerpt before the truncation marker
    pub description: String,

    /// `YYYY-MM-DD` of a blog post, or the front-matter date of a changelog
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    /// Changelog version as named on disk, e.g. `v1.2.0`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Site-relative URL, always derived from the entry name
    pub url: String,
}

impl LatestEntry {
    /// The value the entry was ordered by: its version if it has one, else its date
    pub fn sort_label(&self) -> &str {
        self.version
            .as_deref()
            .or(self.date.as_deref())
            .unwrap_or_default()
    }
}
