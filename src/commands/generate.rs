//! Generate the build-time data file

use anyhow::Result;

use crate::SiteLatest;

/// Resolve the latest entries and write them to the data file
pub async fn run(site: &SiteLatest) -> Result<()> {
    let start = std::time::Instant::now();

    let data = site.load_global_data().await;
    tracing::info!(
        "Resolved latest blog post: {}, latest changelog: {}",
        data.latest_blog_post().is_some(),
        data.latest_changelog().is_some()
    );

    data.write(&site.data_path())?;

    let duration = start.elapsed();
    tracing::info!("Generated in {:.2}s", duration.as_secs_f64());

    Ok(())
}
