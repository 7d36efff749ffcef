//! Build-time global data
//!
//! Holds the latest blog post and changelog for the presentation layer.
//! Each slot is filled at most once during content loading and only read
//! afterwards.

use anyhow::Result;
use serde::{Serialize, Serializer};
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use crate::content::{LatestEntry, Resolver};
use crate::SiteLatest;

/// Latest entries shared with the site
#[derive(Debug, Default)]
pub struct GlobalData {
    latest_blog_post: OnceLock<LatestEntry>,
    latest_changelog: OnceLock<LatestEntry>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Snapshot<'a> {
    latest_blog_post: Option<&'a LatestEntry>,
    latest_changelog: Option<&'a LatestEntry>,
}

impl GlobalData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve both collections of a site, one after the other
    pub async fn load(site: &SiteLatest) -> Self {
        let data = Self::new();

        let blog = Resolver::blog(&site.config, &site.base_dir);
        if let Some(entry) = blog.resolve_latest().await {
            data.set_latest_blog_post(entry);
        }

        let changelog = Resolver::changelog(&site.config, &site.base_dir);
        if let Some(entry) = changelog.resolve_latest().await {
            data.set_latest_changelog(entry);
        }

        data
    }

    /// Returns false, keeping the first value, if the slot was already set
    pub fn set_latest_blog_post(&self, entry: LatestEntry) -> bool {
        set_once(&self.latest_blog_post, entry, "latestBlogPost")
    }

    /// Returns false, keeping the first value, if the slot was already set
    pub fn set_latest_changelog(&self, entry: LatestEntry) -> bool {
        set_once(&self.latest_changelog, entry, "latestChangelog")
    }

    pub fn latest_blog_post(&self) -> Option<&LatestEntry> {
        self.latest_blog_post.get()
    }

    pub fn latest_changelog(&self) -> Option<&LatestEntry> {
        self.latest_changelog.get()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the data as JSON, creating parent directories
    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_json()?)?;
        tracing::info!("Generated {:?}", path);
        Ok(())
    }
}

fn set_once(slot: &OnceLock<LatestEntry>, entry: LatestEntry, key: &str) -> bool {
    match slot.set(entry) {
        Ok(()) => true,
        Err(_) => {
            tracing::warn!("{} is already set, ignoring new value", key);
            false
        }
    }
}

impl Serialize for GlobalData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Snapshot {
            latest_blog_post: self.latest_blog_post(),
            latest_changelog: self.latest_changelog(),
        }
        .serialize(serializer)
    }
}
