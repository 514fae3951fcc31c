//! Anchors defined by Markdown source text.
//!
//! Rendered pages only tell us which ids exist on the page being scanned.
//! For links into other pages we go back to the Markdown source of the target
//! and derive the ids its renderer would have produced.

mod heading;
mod slug;

use std::{collections::HashSet, sync::LazyLock};

use regex::Regex;

use heading::{ATTR_LIST_ANCHOR, Heading};
pub use slug::slugify;

static FENCE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s{0,3}(`{3,}|~{3,})").unwrap());

static RAW_ANCHOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<a\s+(?:[^>]*?\s)?id="([^"]*)""#).unwrap());

/// Iterate over the lines of `markdown` which are not inside a fenced code
/// block. The fence lines themselves are skipped as well.
fn prose_lines(markdown: &str) -> impl Iterator<Item = &str> {
    let mut open: Option<String> = None;
    markdown.lines().filter(move |line| {
        let fence = FENCE.captures(line).map(|caps| caps[1].to_string());
        match open.take() {
            None => match fence {
                Some(marker) => {
                    open = Some(marker);
                    false
                }
                None => true,
            },
            // A fence is closed by the same character, at least as long
            Some(marker) => {
                let closes = fence.is_some_and(|closing| {
                    closing.starts_with(&marker[..1]) && closing.len() >= marker.len()
                });
                if !closes {
                    open = Some(marker);
                }
                false
            }
        }
    })
}

/// Collect every anchor the Markdown renderer would emit for `markdown`.
///
/// Explicit ids come first: attribute lists anywhere in the text and raw
/// `<a id="...">` tags. Headings without an explicit id then get a slug of
/// their text, made unique against all ids seen so far.
#[must_use]
pub fn extract_markdown_anchors(markdown: &str) -> HashSet<String> {
    let mut anchors = HashSet::new();

    for line in prose_lines(markdown) {
        for caps in ATTR_LIST_ANCHOR.captures_iter(line) {
            anchors.insert(caps[1].to_string());
        }
        for caps in RAW_ANCHOR.captures_iter(line) {
            anchors.insert(caps[1].to_string());
        }
    }

    let mut used = anchors.clone();
    for heading in prose_lines(markdown).filter_map(Heading::parse) {
        if heading.anchor_override().is_none() {
            anchors.insert(slug::unique(heading.slug(), &mut used));
        }
    }

    anchors
}

/// Check whether `markdown` defines `anchor`, either through a heading or an
/// explicit id.
///
/// ```
/// use proofer_lib::contains_anchor;
///
/// assert!(contains_anchor("## My Heading", "my-heading"));
/// assert!(contains_anchor("## Heading {#custom}", "custom"));
/// assert!(!contains_anchor("## Heading {#custom}", "heading"));
/// ```
#[must_use]
pub fn contains_anchor(markdown: &str, anchor: &str) -> bool {
    extract_markdown_anchors(markdown).contains(anchor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("git status", "## git status", false)]
    #[case("git-status", "## git status", true)]
    #[case("git-status", "git status", false)]
    #[case("refer-to-this", "## refer to this [![image](image-link)]", true)]
    #[case("git-add-changed-files", "## git add [$changed-files]", true)]
    #[case("delete", "## Delete ![][delete_icon]\n\n[delete_icon]: ./delete.svg", true)]
    #[case("customanchor", "## Heading {#customanchor}", true)]
    #[case("heading", "## Heading {#customanchor}", false)]
    #[case("deploy", "## Deploy :rocket:", true)]
    #[case("hello", "Some text <a id=\"hello\"></a> more text", true)]
    #[case("image-id", "![diagram](diagram.png){ #image-id }", true)]
    #[case("para", "A paragraph.\n{: #para }", true)]
    #[case("second", "Text {#first} and {#second}", true)]
    fn test_contains_anchor(#[case] anchor: &str, #[case] markdown: &str, #[case] expected: bool) {
        assert_eq!(contains_anchor(markdown, anchor), expected);
    }

    #[test]
    fn test_duplicate_headings() {
        let markdown = "# Usage\n\n## Usage\n\n### Usage\n";
        let anchors = extract_markdown_anchors(markdown);
        assert_eq!(
            anchors,
            HashSet::from(["usage", "usage_1", "usage_2"].map(String::from))
        );
    }

    #[test]
    fn test_explicit_id_reserves_slug() {
        let markdown = "Intro {#intro}\n\n# Intro\n";
        let anchors = extract_markdown_anchors(markdown);
        assert!(anchors.contains("intro"));
        assert!(anchors.contains("intro_1"));
    }

    #[test]
    fn test_fenced_code_is_ignored() {
        let markdown = "\
# Real

```bash
# not a heading
echo {#nope}
```

~~~~
# also not
```
still inside
~~~~

## After
";
        let anchors = extract_markdown_anchors(markdown);
        assert_eq!(anchors, HashSet::from(["real", "after"].map(String::from)));
    }

    #[test]
    fn test_unrelated_heading_order() {
        let a = "# One\n# Two\n# Target";
        let b = "# Two\n# Target\n# One";
        assert_eq!(contains_anchor(a, "target"), contains_anchor(b, "target"));
        assert!(contains_anchor(a, "target"));
    }

    #[test]
    fn test_empty_text() {
        assert!(extract_markdown_anchors("").is_empty());
        assert!(!contains_anchor("", "anything"));
    }
}
