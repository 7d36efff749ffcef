//! URL helper functions

/// Generate a URL with the root path
///
/// # Examples
/// ```ignore
/// url_for("/docs/", "/blog/2024/01/02/launch") // -> "/docs/blog/2024/01/02/launch"
/// ```
pub fn url_for(root: &str, path: &str) -> String {
    let root = root.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    if path.is_empty() {
        format!("{}/", root)
    } else {
        format!("{}/{}", root, path)
    }
}

/// Join URL segments with single slashes, skipping empty segments
pub fn join_segments<'a>(segments: impl IntoIterator<Item = &'a str>) -> String {
    segments
        .into_iter()
        .map(|s| s.trim_matches('/'))
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_for() {
        assert_eq!(url_for("/", "/blog/2024/01/02/launch"), "/blog/2024/01/02/launch");
        assert_eq!(url_for("/docs/", "changelogs/v1.0.0"), "/docs/changelogs/v1.0.0");
        assert_eq!(url_for("/", ""), "/");
    }

    #[test]
    fn test_join_segments() {
        assert_eq!(join_segments(["/blog/", "2024/01/02/launch"]), "blog/2024/01/02/launch");
        assert_eq!(join_segments(["changelogs", "", "v1.0.0"]), "changelogs/v1.0.0");
    }
}
