//! Print the latest entries without writing anything

use anyhow::Result;

use crate::SiteLatest;

/// Print the build-time data as JSON on stdout
pub async fn run(site: &SiteLatest) -> Result<()> {
    let data = site.load_global_data().await;
    println!("{}", data.to_json()?);
    Ok(())
}
