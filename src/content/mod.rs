//! Content module - finds and summarizes the latest entry of a collection

mod entry;
mod frontmatter;
pub mod kind;
pub mod resolver;
pub mod version;

pub use entry::LatestEntry;
pub use frontmatter::{FrontMatter, ParsedEntry};
pub use kind::{BlogPosts, Candidate, Changelogs, ContentKind};
pub use resolver::{ResolveError, Resolver};
pub use version::Version;
