//! List content candidates

use anyhow::Result;
use std::fmt::Display;

use crate::content::{ContentKind, Resolver};
use crate::SiteLatest;

/// List the candidates of a collection, latest first
pub async fn run(site: &SiteLatest, content_type: &str) -> Result<()> {
    match content_type {
        "post" | "posts" | "blog" => {
            print_candidates(&Resolver::blog(&site.config, &site.base_dir)).await
        }
        "changelog" | "changelogs" => {
            print_candidates(&Resolver::changelog(&site.config, &site.base_dir)).await
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: post, changelog",
                content_type
            );
        }
    }
}

async fn print_candidates<K>(resolver: &Resolver<K>) -> Result<()>
where
    K: ContentKind,
    K::Key: Display,
{
    let candidates = resolver.candidates().await?;
    println!(
        "{} entries in {:?} ({}):",
        resolver.kind().label(),
        resolver.root(),
        candidates.len()
    );
    for candidate in candidates {
        let shape = if candidate.is_dir { "dir" } else { "file" };
        println!("  {} - {} [{}]", candidate.key, candidate.name, shape);
    }
    Ok(())
}
