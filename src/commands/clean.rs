//! Clean the generated data file

use anyhow::Result;
use std::fs;

use crate::SiteLatest;

/// Delete the data file if it exists
pub fn run(site: &SiteLatest) -> Result<()> {
    let data_path = site.data_path();
    if data_path.exists() {
        fs::remove_file(&data_path)?;
        tracing::info!("Deleted: {:?}", data_path);
    }

    Ok(())
}
