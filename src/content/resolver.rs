//! Latest-content resolver
//!
//! Lists a content root, keeps the entries whose names follow the
//! collection's convention, picks the most recent one and summarizes it.
//! Every failure stops at [`Resolver::resolve_latest`], which logs it and
//! reports "no latest entry" so a broken content tree never fails a build.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::fs;

use super::kind::{has_markup_extension, is_index_file, Candidate, ContentKind};
use super::{BlogPosts, Changelogs, LatestEntry, ParsedEntry};
use crate::config::{ContentConfig, SiteConfig};
use crate::helpers::{join_segments, url_for};

/// Marker separating the excerpt from the rest of a post
pub const TRUNCATE_MARKER: &str = "<!-- truncate -->";

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("Content root {path:?} is unavailable: {source}")]
    ContentRootUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No matching entries in {0:?}")]
    NoCandidatesFound(PathBuf),

    #[error("No index.md or index.mdx in {0:?}")]
    IndexFileMissing(PathBuf),

    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Resolves the latest entry of one content collection
#[derive(Debug, Clone)]
pub struct Resolver<K: ContentKind> {
    kind: K,
    root: PathBuf,
    route: String,
    site_root: String,
    truncate_marker: String,
}

impl Resolver<BlogPosts> {
    /// Blog resolver configured from the site config
    pub fn blog(config: &SiteConfig, base_dir: &Path) -> Self {
        Self::from_config(BlogPosts, config, &config.blog, base_dir)
    }
}

impl Resolver<Changelogs> {
    /// Changelog resolver configured from the site config
    pub fn changelog(config: &SiteConfig, base_dir: &Path) -> Self {
        Self::from_config(Changelogs, config, &config.changelog, base_dir)
    }
}

impl<K: ContentKind> Resolver<K> {
    /// Create a resolver over `root` with default route and marker
    pub fn new(kind: K, root: impl Into<PathBuf>) -> Self {
        let route = kind.default_route().to_string();
        Self {
            kind,
            root: root.into(),
            route,
            site_root: "/".to_string(),
            truncate_marker: TRUNCATE_MARKER.to_string(),
        }
    }

    fn from_config(kind: K, config: &SiteConfig, content: &ContentConfig, base_dir: &Path) -> Self {
        let dir = content.dir.as_deref().unwrap_or(kind.default_dir());
        let route = content
            .route
            .as_deref()
            .unwrap_or(kind.default_route())
            .to_string();
        Self::new(kind, base_dir.join(dir))
            .with_route(&route)
            .with_site_root(&config.root)
            .with_truncate_marker(&config.truncate_marker)
    }

    pub fn with_route(mut self, route: &str) -> Self {
        self.route = route.to_string();
        self
    }

    pub fn with_site_root(mut self, root: &str) -> Self {
        self.site_root = root.to_string();
        self
    }

    pub fn with_truncate_marker(mut self, marker: &str) -> Self {
        self.truncate_marker = marker.to_string();
        self
    }

    pub fn kind(&self) -> &K {
        &self.kind
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve the latest entry, logging and swallowing any failure
    pub async fn resolve_latest(&self) -> Option<LatestEntry> {
        match self.resolve().await {
            Ok(entry) => {
                tracing::info!(
                    "Latest {}: {} ({})",
                    self.kind.label(),
                    entry.sort_label(),
                    entry.url
                );
                Some(entry)
            }
            Err(e @ ResolveError::NoCandidatesFound(_)) => {
                tracing::info!("No latest {}: {}", self.kind.label(), e);
                None
            }
            Err(e) => {
                tracing::warn!("Error loading latest {}: {}", self.kind.label(), e);
                None
            }
        }
    }

    /// Resolve the latest entry
    pub async fn resolve(&self) -> Result<LatestEntry, ResolveError> {
        let latest = self
            .candidates()
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ResolveError::NoCandidatesFound(self.root.clone()))?;

        let source = self.resolve_source(&latest).await?;
        tracing::debug!("Reading {} from {:?}", self.kind.label(), source);

        let content = fs::read_to_string(&source)
            .await
            .map_err(|source_err| ResolveError::Io {
                path: source.clone(),
                source: source_err,
            })?;
        let parsed = ParsedEntry::parse(&content);
        if parsed.degraded {
            tracing::warn!("Ignoring malformed front-matter in {:?}", source);
        }

        Ok(self.summarize(latest.stem(), &parsed))
    }

    /// All candidates under the root, most recent first.
    ///
    /// Entries with equal keys are ordered by name, greatest first, so the
    /// result does not depend on directory listing order.
    pub async fn candidates(&self) -> Result<Vec<Candidate<K::Key>>, ResolveError> {
        let unavailable = |source: std::io::Error| ResolveError::ContentRootUnavailable {
            path: self.root.clone(),
            source,
        };

        let mut entries = fs::read_dir(&self.root).await.map_err(unavailable)?;
        let mut candidates = Vec::new();

        while let Some(entry) = entries.next_entry().await.map_err(unavailable)? {
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                tracing::debug!("Skipping non UTF-8 name {:?}", entry.file_name());
                continue;
            };
            if !self.kind.matches(&name) {
                tracing::debug!("Skipping {:?}: not a {} name", name, self.kind.label());
                continue;
            }
            let Some(key) = self.kind.sort_key(&name) else {
                tracing::warn!("Skipping {:?}: cannot read its {} key", name, self.kind.label());
                continue;
            };

            let path = entry.path();
            // Follow symlinks the way a plain listing would
            let is_dir = match fs::metadata(&path).await {
                Ok(metadata) => metadata.is_dir(),
                Err(e) => {
                    tracing::warn!("Skipping {:?}: {}", path, e);
                    continue;
                }
            };

            candidates.push(Candidate {
                name,
                path,
                is_dir,
                key,
            });
        }

        candidates.sort_by(|a, b| {
            self.kind
                .compare(&a.key, &b.key)
                .then_with(|| b.name.cmp(&a.name))
        });

        Ok(candidates)
    }

    /// The markup file backing a candidate
    async fn resolve_source(&self, candidate: &Candidate<K::Key>) -> Result<PathBuf, ResolveError> {
        if !candidate.is_dir && has_markup_extension(&candidate.name) {
            return Ok(candidate.path.clone());
        }

        let mut children =
            fs::read_dir(&candidate.path)
                .await
                .map_err(|source| ResolveError::Io {
                    path: candidate.path.clone(),
                    source,
                })?;

        let mut index_files = Vec::new();
        loop {
            let child = children.next_entry().await.map_err(|source| ResolveError::Io {
                path: candidate.path.clone(),
                source,
            })?;
            let Some(child) = child else {
                break;
            };
            if child.file_name().to_str().is_some_and(is_index_file) {
                index_files.push(child.path());
            }
        }

        // index.md wins over index.mdx
        index_files.sort();
        index_files
            .into_iter()
            .next()
            .ok_or_else(|| ResolveError::IndexFileMissing(candidate.path.clone()))
    }

    /// Build the latest-entry record for a candidate stem and its parsed source
    pub fn summarize(&self, stem: &str, parsed: &ParsedEntry) -> LatestEntry {
        let fm = &parsed.front_matter;
        let fields = self.kind.name_fields(stem, fm);

        let title = fm.text("title").unwrap_or(fields.title);
        let description = fm
            .text("description")
            .unwrap_or_else(|| excerpt(&parsed.body, &self.truncate_marker).to_string());
        let url = url_for(&self.site_root, &join_segments([self.route.as_str(), fields.path.as_str()]));

        LatestEntry {
            title,
            description,
            date: fields.date,
            version: fields.version,
            url,
        }
    }
}

/// Body text before the first truncation marker, or the whole body
fn excerpt<'a>(body: &'a str, marker: &str) -> &'a str {
    match body.find(marker) {
        Some(pos) if !marker.is_empty() => &body[..pos],
        _ => body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs as std_fs;
    use tempfile::TempDir;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            std_fs::create_dir_all(parent).unwrap();
        }
        std_fs::write(path, content).unwrap();
    }

    #[test]
    fn test_excerpt() {
        assert_eq!(excerpt("Hello<!-- truncate -->World", TRUNCATE_MARKER), "Hello");
        assert_eq!(excerpt("No marker here", TRUNCATE_MARKER), "No marker here");
        assert_eq!(
            excerpt("a<!-- truncate -->b<!-- truncate -->c", TRUNCATE_MARKER),
            "a"
        );
        assert_eq!(excerpt("anything", ""), "anything");
    }

    #[tokio::test]
    async fn test_latest_blog_post_by_date() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "2023-12-31-old-news.md", "Old");
        write(dir.path(), "2024-03-01-spring-release.mdx", "Spring<!-- truncate -->More");
        write(dir.path(), "2024-01-15-mid.md", "Mid");
        write(dir.path(), "authors.yml", "jane: {}");
        write(dir.path(), "README.md", "not a post");

        let resolver = Resolver::new(BlogPosts, dir.path());
        let entry = resolver.resolve().await.unwrap();

        assert_eq!(entry.title, "Spring Release");
        assert_eq!(entry.description, "Spring");
        assert_eq!(entry.date.as_deref(), Some("2024-03-01"));
        assert_eq!(entry.version, None);
        assert_eq!(entry.url, "/blog/2024/03/01/spring-release");
    }

    #[tokio::test]
    async fn test_selected_key_is_greatest() {
        let dir = TempDir::new().unwrap();
        for name in [
            "2021-06-01-a.md",
            "2024-11-30-b.md",
            "2024-02-29-c.md",
            "2019-01-01-d",
            "2024-11-03-e.mdx",
        ] {
            if name.ends_with(".md") || name.ends_with(".mdx") {
                write(dir.path(), name, "body");
            } else {
                write(dir.path(), &format!("{}/index.md", name), "body");
            }
        }

        let resolver = Resolver::new(BlogPosts, dir.path());
        let candidates = resolver.candidates().await.unwrap();
        assert_eq!(candidates.len(), 5);
        let first = &candidates[0];
        assert!(candidates.iter().all(|c| first.key >= c.key));
        assert!(candidates.windows(2).all(|w| w[0].key >= w[1].key));
        assert_eq!(first.name, "2024-11-30-b.md");
    }

    #[tokio::test]
    async fn test_front_matter_round_trip() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "2024-05-01-ignored-slug.md",
            "---\ntitle: \"Exact: Title\"\ndescription: Exact description.\n---\nBody<!-- truncate -->rest",
        );

        let entry = Resolver::new(BlogPosts, dir.path()).resolve().await.unwrap();
        assert_eq!(entry.title, "Exact: Title");
        assert_eq!(entry.description, "Exact description.");
        // The URL never comes from front-matter
        assert_eq!(entry.url, "/blog/2024/05/01/ignored-slug");
    }

    #[tokio::test]
    async fn test_truncate_fallback_without_front_matter() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "2024-05-01-hello.md", "Hello<!-- truncate -->World");

        let entry = Resolver::new(BlogPosts, dir.path()).resolve().await.unwrap();
        assert_eq!(entry.description, "Hello");
        assert_eq!(entry.title, "Hello");
    }

    #[tokio::test]
    async fn test_directory_entry_matches_flat_file() {
        let content = "---\ndescription: Launch day\n---\nWe launched.<!-- truncate -->Details";

        let flat = TempDir::new().unwrap();
        write(flat.path(), "2024-01-02-launch.mdx", content);
        let nested = TempDir::new().unwrap();
        write(nested.path(), "2024-01-02-launch/index.mdx", content);
        write(nested.path(), "2024-01-02-launch/cover.png", "png");

        let from_flat = Resolver::new(BlogPosts, flat.path()).resolve().await.unwrap();
        let from_dir = Resolver::new(BlogPosts, nested.path()).resolve().await.unwrap();
        assert_eq!(from_flat, from_dir);
        assert_eq!(from_dir.url, "/blog/2024/01/02/launch");
    }

    #[tokio::test]
    async fn test_index_md_preferred_over_mdx() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "2024-01-02-launch/index.mdx", "From mdx");
        write(dir.path(), "2024-01-02-launch/index.md", "From md");

        let entry = Resolver::new(BlogPosts, dir.path()).resolve().await.unwrap();
        assert_eq!(entry.description, "From md");
    }

    #[tokio::test]
    async fn test_missing_index_file() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "2024-01-02-launch/notes.md", "not an index");

        let resolver = Resolver::new(BlogPosts, dir.path());
        let err = resolver.resolve().await.unwrap_err();
        assert!(matches!(err, ResolveError::IndexFileMissing(_)));
        assert_eq!(resolver.resolve_latest().await, None);
    }

    #[tokio::test]
    async fn test_changelog_version_ordering() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "v1.2.0.md", "One two");
        write(dir.path(), "v1.10.0.md", "One ten");
        write(dir.path(), "v2.0.0-beta/index.md", "---\ndate: 2024-06-01\n---\nBeta<!-- truncate -->notes");

        let resolver = Resolver::new(Changelogs, dir.path());
        let names: Vec<String> = resolver
            .candidates()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["v2.0.0-beta", "v1.10.0.md", "v1.2.0.md"]);

        let entry = resolver.resolve().await.unwrap();
        assert_eq!(entry.version.as_deref(), Some("v2.0.0-beta"));
        assert_eq!(entry.title, "v2.0.0-beta");
        assert_eq!(entry.date.as_deref(), Some("2024-06-01"));
        assert_eq!(entry.description, "Beta");
        assert_eq!(entry.url, "/changelogs/v2.0.0-beta");
    }

    #[tokio::test]
    async fn test_minor_version_compared_numerically() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "v1.2.0.md", "old");
        write(dir.path(), "v1.10.0.mdx", "new");
        write(dir.path(), "v1.9.9-rc.1.md", "rc");

        let entry = Resolver::new(Changelogs, dir.path()).resolve().await.unwrap();
        assert_eq!(entry.version.as_deref(), Some("v1.10.0"));
        assert_eq!(entry.date, None);
    }

    #[tokio::test]
    async fn test_prerelease_below_release() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "v3.0.0-rc.2.md", "rc");
        write(dir.path(), "v3.0.0.md", "final");
        write(dir.path(), "v3.0.0+build.7.md", "rebuilt");

        let resolver = Resolver::new(Changelogs, dir.path());
        let candidates = resolver.candidates().await.unwrap();
        assert_eq!(candidates.last().unwrap().name, "v3.0.0-rc.2.md");
    }

    #[tokio::test]
    async fn test_equal_keys_break_ties_by_name() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "2024-01-02-alpha.md", "a");
        write(dir.path(), "2024-01-02-zulu.md", "z");
        write(dir.path(), "2024-01-02-mike.md", "m");

        let entry = Resolver::new(BlogPosts, dir.path()).resolve().await.unwrap();
        assert_eq!(entry.title, "Zulu");
    }

    #[tokio::test]
    async fn test_empty_root_is_not_found() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "notes.txt", "nothing dated");

        let resolver = Resolver::new(BlogPosts, dir.path());
        assert!(matches!(
            resolver.resolve().await,
            Err(ResolveError::NoCandidatesFound(_))
        ));
        assert_eq!(resolver.resolve_latest().await, None);
    }

    #[tokio::test]
    async fn test_missing_root_is_not_found() {
        let dir = TempDir::new().unwrap();
        let resolver = Resolver::new(Changelogs, dir.path().join("changelogs"));
        assert!(matches!(
            resolver.resolve().await,
            Err(ResolveError::ContentRootUnavailable { .. })
        ));
        assert_eq!(resolver.resolve_latest().await, None);
    }

    #[tokio::test]
    async fn test_invalid_dates_are_skipped() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "2024-13-45-broken.md", "broken");
        write(dir.path(), "2020-01-01-valid.md", "valid");

        let entry = Resolver::new(BlogPosts, dir.path()).resolve().await.unwrap();
        assert_eq!(entry.title, "Valid");
    }

    #[tokio::test]
    async fn test_malformed_front_matter_uses_body_verbatim() {
        let dir = TempDir::new().unwrap();
        let content = "---\ntitle: [oops\n---\nText without marker\n";
        write(dir.path(), "2024-07-04-broken-meta.md", content);

        let entry = Resolver::new(BlogPosts, dir.path()).resolve().await.unwrap();
        assert_eq!(entry.title, "Broken Meta");
        assert_eq!(entry.description, content);
    }

    #[tokio::test]
    async fn test_non_markup_file_candidate_is_not_found() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "2024-07-04-cover.png", "png");

        let resolver = Resolver::new(BlogPosts, dir.path());
        assert!(matches!(resolver.resolve().await, Err(ResolveError::Io { .. })));
        assert_eq!(resolver.resolve_latest().await, None);
    }

    #[tokio::test]
    async fn test_configured_routes_and_marker() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "news/2024-01-02-launch.md", "Short{/* more */}Long");

        let config: SiteConfig = serde_yaml::from_str(
            "root: /docs/\ntruncate_marker: '{/* more */}'\nblog:\n  dir: news\n  route: updates\n",
        )
        .unwrap();
        let entry = Resolver::blog(&config, dir.path()).resolve().await.unwrap();
        assert_eq!(entry.url, "/docs/updates/2024/01/02/launch");
        assert_eq!(entry.description, "Short");
    }

    #[tokio::test]
    async fn test_partial_content_config_keeps_default_route() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "news/2024-01-02-launch.md", "Launch");
        write(dir.path(), "release-notes/v1.0.0.md", "First release");

        let config: SiteConfig =
            serde_yaml::from_str("blog:\n  dir: news\nchangelog:\n  dir: release-notes\n").unwrap();

        let post = Resolver::blog(&config, dir.path()).resolve().await.unwrap();
        assert_eq!(post.url, "/blog/2024/01/02/launch");

        let changelog = Resolver::changelog(&config, dir.path()).resolve().await.unwrap();
        assert_eq!(changelog.url, "/changelogs/v1.0.0");
    }
}
