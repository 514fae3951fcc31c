use path_clean::PathClean;
use percent_encoding::percent_decode_str;
use std::path::{Component, Path, PathBuf};

/// Lexically normalize a path inside the output tree.
///
/// `.` and `..` components are collapsed without touching the file system,
/// a leading `./` is dropped and the root directory becomes the empty path.
pub(crate) fn normalize(path: &Path) -> PathBuf {
    let cleaned = path.clean();
    if cleaned.components().all(|c| matches!(c, Component::CurDir)) {
        return PathBuf::new();
    }
    cleaned
}

/// Split a URL at its first `#` into the path and the anchor.
///
/// An empty anchor (`page.html#`) is treated as no anchor at all.
pub(crate) fn split_fragment(url: &str) -> (&str, Option<&str>) {
    match url.split_once('#') {
        Some((path, anchor)) if !anchor.is_empty() => (path, Some(anchor)),
        Some((path, _)) => (path, None),
        None => (url, None),
    }
}

/// Resolve the path portion of a local link.
///
/// Paths starting with `/` are relative to the root of the output tree,
/// everything else is relative to `base_dir`. Query strings are dropped and
/// percent-encoded characters decoded.
pub(crate) fn resolve(base_dir: &Path, link: &str) -> PathBuf {
    let link = link.split_once('?').map_or(link, |(path, _)| path);
    let link = percent_decode_str(link).decode_utf8_lossy();
    match link.strip_prefix('/') {
        Some(root_relative) => normalize(Path::new(root_relative.trim_start_matches('/'))),
        None => normalize(&base_dir.join(link.as_ref())),
    }
}

#[cfg(test)]
mod test_path {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("index.html", "index.html")]
    #[case("./index.html", "index.html")]
    #[case("foo/./bar/../index.html", "foo/index.html")]
    #[case(".", "")]
    #[case("", "")]
    fn test_normalize(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalize(Path::new(input)), PathBuf::from(expected));
    }

    #[rstest]
    #[case("page.html#anchor", "page.html", Some("anchor"))]
    #[case("page.html", "page.html", None)]
    #[case("page.html#", "page.html", None)]
    #[case("#anchor", "", Some("anchor"))]
    #[case("page.html#a#b", "page.html", Some("a#b"))]
    fn test_split_fragment(
        #[case] url: &str,
        #[case] path: &str,
        #[case] anchor: Option<&str>,
    ) {
        assert_eq!(split_fragment(url), (path, anchor));
    }

    // foo/bar/sibling.html
    // nested.html
    #[test]
    fn test_resolve_relative() {
        assert_eq!(
            resolve(Path::new("foo/bar"), "nested.html"),
            PathBuf::from("foo/bar/nested.html")
        );
    }

    // foo/bar/sibling.html
    // ../baz/nested.html
    #[test]
    fn test_resolve_parent() {
        assert_eq!(
            resolve(Path::new("foo/bar"), "../baz/nested.html"),
            PathBuf::from("foo/baz/nested.html")
        );
    }

    // foo/bar/sibling.html
    // /index.html
    #[test]
    fn test_resolve_root_relative() {
        assert_eq!(
            resolve(Path::new("foo/bar"), "/index.html"),
            PathBuf::from("index.html")
        );
    }

    #[test]
    fn test_resolve_query_and_encoding() {
        assert_eq!(
            resolve(Path::new(""), "my%20file.html?version=2"),
            PathBuf::from("my file.html")
        );
    }

    #[test]
    fn test_resolve_escaping_root() {
        assert_eq!(
            resolve(Path::new("foo"), "../../outside.html"),
            PathBuf::from("../outside.html")
        );
    }
}
