use html5gum::{
    Tokenizer,
    emitters::callback::{Callback, CallbackEmitter, CallbackEvent},
};
use std::collections::{HashMap, HashSet};

/// Elements which can carry a link or a link target on a rendered page.
/// Everything else is skipped, pages can be large.
const ELEMENTS: [&str; 10] = ["a", "h1", "h2", "h3", "h4", "h5", "h6", "li", "sup", "img"];

/// Links and link targets found on one rendered page
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PageLinks {
    /// Distinct `href` and `src` values
    pub urls: HashSet<String>,
    /// Element ids on the page. Always contains the empty id, which is what
    /// a bare `#` refers to.
    pub ids: HashSet<String>,
}

/// Tokenizer callback collecting [`PageLinks`].
///
/// Attributes are buffered per start tag and flushed once the tag is closed.
#[derive(Debug, Default)]
struct PageExtractor {
    links: PageLinks,
    current_element: String,
    current_attribute_name: String,
    current_attributes: HashMap<String, String>,
}

impl PageExtractor {
    fn new() -> Self {
        let mut extractor = Self::default();
        extractor.links.ids.insert(String::new());
        extractor
    }

    fn flush(&mut self) {
        let element = self.current_element.as_str();
        if !ELEMENTS.contains(&element) {
            self.current_attributes.clear();
            return;
        }

        if let Some(id) = self.current_attributes.remove("id") {
            self.links.ids.insert(id);
        }

        match element {
            "a" => {
                // Older documents still mark targets with `<a name="...">`
                if let Some(name) = self.current_attributes.remove("name") {
                    self.links.ids.insert(name);
                }
                if let Some(href) = self.current_attributes.remove("href") {
                    self.links.urls.insert(href);
                }
            }
            "img" => {
                if let Some(src) = self.current_attributes.remove("src") {
                    self.links.urls.insert(src);
                }
            }
            _ => {}
        }

        self.current_attributes.clear();
    }
}

impl Callback<(), usize> for &mut PageExtractor {
    fn handle_event(
        &mut self,
        event: CallbackEvent<'_>,
        _span: html5gum::Span<usize>,
    ) -> Option<()> {
        match event {
            CallbackEvent::OpenStartTag { name } => {
                self.current_element = String::from_utf8_lossy(name).into_owned();
                self.current_attributes.clear();
            }
            CallbackEvent::AttributeName { name } => {
                self.current_attribute_name = String::from_utf8_lossy(name).into_owned();
            }
            CallbackEvent::AttributeValue { value } => {
                let value = String::from_utf8_lossy(value);
                self.current_attributes
                    .entry(self.current_attribute_name.clone())
                    .and_modify(|v| v.push_str(&value))
                    .or_insert_with(|| value.into_owned());
            }
            CallbackEvent::CloseStartTag { .. } => self.flush(),
            CallbackEvent::EndTag { .. }
            | CallbackEvent::String { .. }
            | CallbackEvent::Comment { .. }
            | CallbackEvent::Doctype { .. }
            | CallbackEvent::Error(_) => {}
        }
        None
    }
}

/// Extract the links and element ids of a rendered page.
#[must_use]
pub fn extract_page_links(buf: &str) -> PageLinks {
    let mut extractor = PageExtractor::new();
    let mut tokenizer = Tokenizer::new_with_emitter(buf, CallbackEmitter::new(&mut extractor));
    assert!(tokenizer.next().is_none());
    extractor.links
}
