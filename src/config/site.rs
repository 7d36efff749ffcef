//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // URL
    pub root: String,

    // Output
    pub public_dir: String,
    pub data_file: String,

    // Content
    pub truncate_marker: String,
    pub blog: ContentConfig,
    pub changelog: ContentConfig,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            root: "/".to_string(),

            public_dir: "public".to_string(),
            data_file: "latest.json".to_string(),

            truncate_marker: "<!-- truncate -->".to_string(),
            blog: ContentConfig::default(),
            changelog: ContentConfig::default(),

            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}

/// Where one content collection lives and which route serves it.
///
/// Unset fields fall back to the collection's own defaults when the
/// resolver is built.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Directory holding the entries, relative to the base directory
    pub dir: Option<String>,
    /// Route prefix used when building entry URLs
    pub route: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let yaml = r#"
root: /docs/
changelog:
  dir: release-notes
  route: releases
theme: classic
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.root, "/docs/");
        assert_eq!(config.changelog.dir.as_deref(), Some("release-notes"));
        assert_eq!(config.changelog.route.as_deref(), Some("releases"));
        assert_eq!(config.blog.dir, None);
        assert_eq!(config.truncate_marker, "<!-- truncate -->");
        assert!(config.extra.contains_key("theme"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("_config.yml");
        fs::write(&path, "public_dir: build\ndata_file: data.json\n").unwrap();

        let config = SiteConfig::load(&path).unwrap();
        assert_eq!(config.public_dir, "build");
        assert_eq!(config.data_file, "data.json");
        assert_eq!(config.root, "/");
    }

    #[test]
    fn test_content_section_fields_default_independently() {
        let config: SiteConfig = serde_yaml::from_str("blog:\n  dir: news\n").unwrap();
        assert_eq!(config.blog.dir.as_deref(), Some("news"));
        assert_eq!(config.blog.route, None);

        let config: SiteConfig = serde_yaml::from_str("changelog:\n  route: releases\n").unwrap();
        assert_eq!(config.changelog.dir, None);
        assert_eq!(config.changelog.route.as_deref(), Some("releases"));

        let config: SiteConfig = serde_yaml::from_str("blog: {}\n").unwrap();
        assert_eq!(config.blog.dir, None);
    }

    #[test]
    fn test_site_url_is_not_a_config_field() {
        let config: SiteConfig = serde_yaml::from_str("url: https://docs.example.com\n").unwrap();
        assert!(config.extra.contains_key("url"));
    }
}
