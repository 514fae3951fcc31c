//! Lexer for Markdown heading lines.
//!
//! A heading such as
//!
//! ```text
//! ## Install :rocket: [![badge](badge.svg)](ci.html) { #setup .wide }
//! ```
//!
//! is split into its raw text and an optional anchor override from its
//! attribute list. The rendered text is derived from the raw text by a fixed
//! sequence of [`Strip`] stages.

use std::{borrow::Cow, sync::LazyLock};

use regex::Regex;

use super::slug::slugify;

static HEADING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*#+\s*(.*)$").unwrap());

/// An attribute list carrying an id, e.g. `{#anchor}` or `{: #anchor .class }`
pub(crate) static ATTR_LIST_ANCHOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{.*?#([^\s}]*).*?\}").unwrap());

static ATTR_LIST: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{.*?\}").unwrap());

// Linked images swallow the rest of the heading, like `[![alt](src)] ...`
// and reference images `![alt][ref] ...`. Inline images are removed in place.
static IMAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[!\[.*\]\(.*\)\].*|!\[.*\]\[.*\].*|!\[[^\]]*\]\([^)]*\)").unwrap()
});

static EMOJI: LazyLock<Regex> = LazyLock::new(|| Regex::new(r":[a-z0-9_-]+:").unwrap());

static LINK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[([^\]]*)\]\([^)]*\)").unwrap());

static HTML_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());

/// One stage of turning raw heading text into the text a renderer would
/// derive the anchor from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Strip {
    /// `{...}` attribute lists
    AttributeLists,
    /// Image markup, which never contributes to the anchor
    Images,
    /// `:shortcode:` emoji
    Emoji,
    /// `[text](target)` links are reduced to their text
    Links,
    /// Inline HTML tags (their text content stays)
    HtmlTags,
}

impl Strip {
    /// The stages in the order they are applied
    pub(crate) const PIPELINE: [Strip; 5] = [
        Strip::AttributeLists,
        Strip::Images,
        Strip::Emoji,
        Strip::Links,
        Strip::HtmlTags,
    ];

    pub(crate) fn apply(self, text: &str) -> Cow<'_, str> {
        match self {
            Strip::AttributeLists => ATTR_LIST.replace_all(text, ""),
            Strip::Images => IMAGE.replace_all(text, ""),
            Strip::Emoji => EMOJI.replace_all(text, ""),
            Strip::Links => LINK.replace_all(text, "$1"),
            Strip::HtmlTags => HTML_TAG.replace_all(text, ""),
        }
    }
}

/// A line starting with one or more `#`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Heading<'a> {
    raw: &'a str,
}

impl<'a> Heading<'a> {
    /// Returns `None` if `line` is not a heading
    pub(crate) fn parse(line: &'a str) -> Option<Self> {
        let raw = HEADING.captures(line)?.get(1)?.as_str();
        Some(Self { raw })
    }

    /// The id set explicitly through an attribute list, which replaces the
    /// derived slug
    pub(crate) fn anchor_override(&self) -> Option<&'a str> {
        ATTR_LIST_ANCHOR
            .captures(self.raw)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }

    /// The heading text with all markup which does not end up in the anchor
    /// removed
    pub(crate) fn text(&self) -> String {
        Strip::PIPELINE
            .iter()
            .fold(self.raw.to_string(), |text, stage| {
                stage.apply(&text).into_owned()
            })
    }

    /// The anchor derived from the heading text, ignoring any override
    pub(crate) fn slug(&self) -> String {
        slugify(&self.text())
    }
}
