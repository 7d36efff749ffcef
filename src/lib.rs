//! site-latest: finds the latest blog post and changelog of a documentation site
//!
//! Content lives in date- or version-named entries. This crate picks the most
//! recent entry of each collection, reads its front-matter and body, and
//! publishes a normalized summary as build-time data for the site.

pub mod commands;
pub mod config;
pub mod content;
pub mod data;
pub mod helpers;

use anyhow::Result;
use std::path::Path;

/// A documentation site whose latest content is being resolved
#[derive(Clone)]
pub struct SiteLatest {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: std::path::PathBuf,
    /// Public (output) directory
    pub public_dir: std::path::PathBuf,
}

impl SiteLatest {
    /// Create a new instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        let public_dir = base_dir.join(&config.public_dir);

        Ok(Self {
            config,
            base_dir,
            public_dir,
        })
    }

    /// Path of the generated data file
    pub fn data_path(&self) -> std::path::PathBuf {
        self.public_dir.join(&self.config.data_file)
    }

    /// Resolve the latest entries into build-time data
    pub async fn load_global_data(&self) -> data::GlobalData {
        data::GlobalData::load(self).await
    }

    /// Generate the data file
    pub async fn generate(&self) -> Result<()> {
        commands::generate::run(self).await
    }

    /// Remove the data file
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }
}
