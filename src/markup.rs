//! Small helpers over `scraper` shared by the disambiguator and extractor.
//!
//! Parsed documents are not `Send`, so everything here is synchronous and
//! callers drop the [`Html`] before the next `.await`.

use scraper::{ElementRef, Html, Selector};

/// Parse a CSS selector. Invalid selectors match nothing.
pub(crate) fn selector(css: &str) -> Option<Selector> {
    match Selector::parse(css) {
        Ok(sel) => Some(sel),
        Err(e) => {
            eprintln!("Warning: invalid selector '{}': {:?}", css, e);
            None
        }
    }
}

/// All elements of the document matching `css`, in document order.
pub(crate) fn select_all<'a>(doc: &'a Html, css: &str) -> Vec<ElementRef<'a>> {
    match selector(css) {
        Some(sel) => doc.select(&sel).collect(),
        None => Vec::new(),
    }
}

/// First element of the document matching `css`.
pub(crate) fn select_first<'a>(doc: &'a Html, css: &str) -> Option<ElementRef<'a>> {
    let sel = selector(css)?;
    let found = doc.select(&sel).next();
    found
}

/// All descendants of `el` matching `css`, in document order.
pub(crate) fn select_within<'a>(el: ElementRef<'a>, css: &str) -> Vec<ElementRef<'a>> {
    match selector(css) {
        Some(sel) => el.select(&sel).collect(),
        None => Vec::new(),
    }
}

/// Visible text of an element with runs of whitespace collapsed.
pub(crate) fn text_of(el: ElementRef<'_>) -> String {
    el.text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Text of the element, or `None` when it is blank.
pub(crate) fn non_empty_text(el: ElementRef<'_>) -> Option<String> {
    let text = text_of(el);
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}
