use std::{
    collections::HashSet,
    sync::LazyLock,
};

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

static SEPARATORS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[-\s]+").unwrap());
static ID_COUNT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(.*)_([0-9]+)$").unwrap());

/// Turn heading text into the anchor a Markdown renderer assigns to it.
///
/// Non-ASCII characters are decomposed and dropped, everything but word
/// characters, whitespace and dashes is removed, and runs of whitespace and
/// dashes collapse into a single `-`.
///
/// ```
/// use proofer_lib::slugify;
///
/// assert_eq!(slugify("My Heading"), "my-heading");
/// assert_eq!(slugify("git add [$changed-files]"), "git-add-changed-files");
/// assert_eq!(slugify("Über café"), "uber-cafe");
/// ```
#[must_use]
pub fn slugify(text: &str) -> String {
    let ascii: String = text
        .nfkd()
        .filter(char::is_ascii)
        .filter(|c| c.is_ascii_alphanumeric() || c.is_ascii_whitespace() || matches!(c, '_' | '-'))
        .collect();
    let lowered = ascii.trim().to_lowercase();
    SEPARATORS.replace_all(&lowered, "-").into_owned()
}

/// Make `id` unique among `used` the way Markdown renderers do for repeated
/// headings: `id`, `id_1`, `id_2`, ...
pub(crate) fn unique(id: String, used: &mut HashSet<String>) -> String {
    let mut id = id;
    while id.is_empty() || used.contains(&id) {
        id = match ID_COUNT.captures(&id) {
            Some(caps) => {
                let count = caps[2].parse::<u64>().map_or(1, |n| n.saturating_add(1));
                format!("{}_{count}", &caps[1])
            }
            None => format!("{id}_1"),
        };
    }
    used.insert(id.clone());
    id
}
