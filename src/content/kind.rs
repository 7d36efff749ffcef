//! Naming conventions for dated and versioned content collections
//!
//! Each collection encodes its ordering in entry names. A [`ContentKind`]
//! recognizes those names, extracts the sort key and derives the
//! name-based fields of a [`super::LatestEntry`], so the resolver never
//! looks inside a name itself.

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use std::cmp::Ordering;
use std::fmt;
use std::path::PathBuf;

use super::version::Version;
use super::FrontMatter;

lazy_static! {
    static ref DATED_NAME: Regex = Regex::new(r"^(\d{4}-\d{2}-\d{2})-(.*)$").unwrap();
    static ref VERSIONED_NAME: Regex = Regex::new(r"^v\d+\.\d+\.\d+").unwrap();
}

/// Extensions recognized as markup sources
pub const MARKUP_EXTENSIONS: [&str; 2] = ["md", "mdx"];

/// A directory entry whose name follows the collection's convention
#[derive(Debug, Clone)]
pub struct Candidate<K> {
    /// File or directory name as listed
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
    pub key: K,
}

impl<K> Candidate<K> {
    /// The name without its markup extension
    pub fn stem(&self) -> &str {
        strip_markup_extension(&self.name)
    }
}

/// Fields of a latest entry that come from the entry name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameFields {
    /// Title used when front-matter has none
    pub title: String,
    pub date: Option<String>,
    pub version: Option<String>,
    /// URL path below the collection route
    pub path: String,
}

/// Policy for one content collection
pub trait ContentKind {
    type Key: Ord + fmt::Debug;

    /// Collection name used in logs
    fn label(&self) -> &'static str;

    /// Content directory used when the site config does not override it
    fn default_dir(&self) -> &'static str;

    /// Route prefix used when the site config does not override it
    fn default_route(&self) -> &'static str;

    /// Whether a directory entry name belongs to the collection
    fn matches(&self, name: &str) -> bool;

    /// Extract the sort key, `None` if the name cannot be ordered
    fn sort_key(&self, name: &str) -> Option<Self::Key>;

    /// Most recent first
    fn compare(&self, a: &Self::Key, b: &Self::Key) -> Ordering {
        b.cmp(a)
    }

    fn name_fields(&self, stem: &str, front_matter: &FrontMatter) -> NameFields;
}

/// `YYYY-MM-DD-slug` blog posts, newest date first
#[derive(Debug, Clone, Copy, Default)]
pub struct BlogPosts;

impl BlogPosts {
    fn split(stem: &str) -> Option<(&str, &str)> {
        let caps = DATED_NAME.captures(stem)?;
        Some((caps.get(1)?.as_str(), caps.get(2)?.as_str()))
    }
}

impl ContentKind for BlogPosts {
    type Key = NaiveDate;

    fn label(&self) -> &'static str {
        "blog post"
    }

    fn default_dir(&self) -> &'static str {
        "blog"
    }

    fn default_route(&self) -> &'static str {
        "blog"
    }

    fn matches(&self, name: &str) -> bool {
        DATED_NAME.is_match(name)
    }

    fn sort_key(&self, name: &str) -> Option<NaiveDate> {
        let (date, _) = Self::split(strip_markup_extension(name))?;
        NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
    }

    fn name_fields(&self, stem: &str, _front_matter: &FrontMatter) -> NameFields {
        let (date, slug) = Self::split(stem).unwrap_or((stem, ""));
        let title = if slug.is_empty() {
            date.to_string()
        } else {
            title_case(slug)
        };

        NameFields {
            title,
            date: Some(date.to_string()),
            version: None,
            path: format!("{}/{}", date.replace('-', "/"), slug),
        }
    }
}

/// `vMAJOR.MINOR.PATCH[-pre]` changelog entries, highest precedence first
#[derive(Debug, Clone, Copy, Default)]
pub struct Changelogs;

impl ContentKind for Changelogs {
    type Key = Version;

    fn label(&self) -> &'static str {
        "changelog"
    }

    fn default_dir(&self) -> &'static str {
        "changelogs"
    }

    fn default_route(&self) -> &'static str {
        "changelogs"
    }

    fn matches(&self, name: &str) -> bool {
        VERSIONED_NAME.is_match(name)
    }

    fn sort_key(&self, name: &str) -> Option<Version> {
        let stem = strip_markup_extension(name);
        stem.strip_prefix('v')?.parse().ok()
    }

    fn name_fields(&self, stem: &str, front_matter: &FrontMatter) -> NameFields {
        NameFields {
            title: stem.to_string(),
            date: front_matter
                .date()
                .map(|d| d.format("%Y-%m-%d").to_string()),
            version: Some(stem.to_string()),
            path: stem.to_string(),
        }
    }
}

pub fn has_markup_extension(name: &str) -> bool {
    strip_markup_extension(name).len() != name.len()
}

pub fn strip_markup_extension(name: &str) -> &str {
    MARKUP_EXTENSIONS
        .iter()
        .find_map(|ext| {
            name.strip_suffix(ext)
                .and_then(|rest| rest.strip_suffix('.'))
        })
        .unwrap_or(name)
}

/// `index.md` or `index.mdx`
pub fn is_index_file(name: &str) -> bool {
    has_markup_extension(name) && strip_markup_extension(name) == "index"
}

/// `hello-big-world` -> `Hello Big World`
fn title_case(slug: &str) -> String {
    slug.split('-')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
