//! Markdown rendering of item lists for an agent's context window.
//!
//! Each item uses the same layout as [`Item::to_markdown`], under a
//! numbered heading.

use crate::item::Item;

/// Controls how much of each item is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatOptions {
    pub include_abstracts: bool,
    /// Abstracts longer than this many characters are cut and suffixed with `...`.
    pub max_abstract_length: usize,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            include_abstracts: true,
            max_abstract_length: 300,
        }
    }
}

/// Render `items` as a numbered Markdown list.
pub fn format_results(items: &[Item], options: &FormatOptions) -> String {
    if items.is_empty() {
        return "No results found.".to_owned();
    }

    let mut out = format!("# Search Results ({} items)\n\n", items.len());
    for (index, item) in items.iter().enumerate() {
        let heading = format!("{}. {}", index + 1, item.title);
        let abstract_text = options
            .include_abstracts
            .then(|| truncate_chars(&item.abstract_text, options.max_abstract_length));
        out.push_str(&item.render_markdown(&heading, abstract_text.as_deref()));
        out.push_str("\n\n");
    }
    out
}

/// Cut `text` to at most `max` characters on a char boundary, appending
/// `...` when anything was removed.
fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_owned(),
    }
}
