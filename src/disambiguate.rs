//! Search-result disambiguation.
//!
//! Turns a rendered search-results page into at most [`MAX_CANDIDATES`]
//! ranked [`Candidate`]s and resolves the user's numeric choice to one of
//! them. Result links are located with a structural selector first; only
//! when that finds nothing does the parser fall back to any anchor whose
//! target looks like a title detail page.

use reqwest::Url;
use scraper::Html;

use crate::error::DisambiguateError;
use crate::markup::{select_all, text_of};
use crate::models::{Candidate, NOT_AVAILABLE};

/// Maximum number of candidates offered for selection.
pub const MAX_CANDIDATES: usize = 10;

/// Structural marker on result-title links.
const RESULT_TITLE_LINK: &str = r#"a[data-testid="find-result-title-link"]"#;
/// Any anchor pointing at a title detail page.
const TITLE_PATH_LINK: &str = r#"a[href*="/title/tt"]"#;

/// The user's resolved choice among the candidates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection<'a> {
    /// Selection `0` or no selection at all.
    Cancelled,
    Chosen(&'a Candidate),
}

/// Parse candidates from a search-results page.
///
/// `base` resolves relative hrefs into absolute locators. `query` is only
/// used to give the "no results" warning some context.
pub fn parse_candidates(
    markup: &str,
    base: &Url,
    query: &str,
) -> Result<Vec<Candidate>, DisambiguateError> {
    let doc = Html::parse_document(markup);

    let mut links = result_links(&doc, RESULT_TITLE_LINK, base);
    if links.is_empty() {
        links = result_links(&doc, TITLE_PATH_LINK, base);
    }
    if links.is_empty() {
        eprintln!("Warning: no result links found on search page for '{}'", query);
        return Err(DisambiguateError::NoResultsFound);
    }

    Ok(links
        .into_iter()
        .take(MAX_CANDIDATES)
        .enumerate()
        .map(|(idx, (title, href, locator))| Candidate {
            rank: idx as u32 + 1,
            year: year_from_title(&title),
            id: title_id(&href),
            title,
            locator,
        })
        .collect())
}

/// Resolve a selection index against the ranked candidates.
///
/// `None` and `0` cancel; `1..=N` choose the candidate at that rank;
/// anything larger is rejected.
pub fn resolve_selection(
    candidates: &[Candidate],
    choice: Option<u32>,
) -> Result<Selection<'_>, DisambiguateError> {
    let max = candidates.len() as u32;
    match choice {
        None | Some(0) => Ok(Selection::Cancelled),
        Some(k) if k <= max => Ok(Selection::Chosen(&candidates[(k - 1) as usize])),
        Some(k) => Err(DisambiguateError::InvalidSelection { choice: k, max }),
    }
}

/// (visible title, raw href, absolute locator) for each usable link.
///
/// Links without text (poster thumbnails) or without an href are skipped,
/// as are repeats of a locator already seen.
fn result_links(doc: &Html, css: &str, base: &Url) -> Vec<(String, String, String)> {
    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::new();
    for anchor in select_all(doc, css) {
        let title = text_of(anchor);
        let href = anchor.value().attr("href").unwrap_or("").trim();
        if title.is_empty() || href.is_empty() {
            continue;
        }
        let Some(locator) = absolute_locator(href, base) else {
            continue;
        };
        if seen.insert(locator.clone()) {
            out.push((title, href.to_string(), locator));
        }
    }
    out
}

fn absolute_locator(href: &str, base: &Url) -> Option<String> {
    if href.starts_with("http://") || href.starts_with("https://") {
        return Some(href.to_string());
    }
    match base.join(href) {
        Ok(url) => Some(url.to_string()),
        Err(e) => {
            eprintln!("Warning: skipping result with unusable href '{}': {}", href, e);
            None
        }
    }
}

/// Year from the last parenthesis group of a result title, else `"N/A"`.
fn year_from_title(title: &str) -> String {
    if !(title.contains('(') && title.contains(')')) {
        return NOT_AVAILABLE.to_string();
    }
    match title.rsplit_once('(') {
        Some((_, tail)) => {
            let year = tail.replace(')', "");
            let year = year.trim();
            if year.is_empty() {
                NOT_AVAILABLE.to_string()
            } else {
                year.to_string()
            }
        }
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Identifier segment following `/title/` in an href.
fn title_id(href: &str) -> Option<String> {
    let (_, rest) = href.split_once("/title/")?;
    let id = rest.split(['/', '?', '#']).next()?;
    if id.is_empty() {
        None
    } else {
        Some(id.to_string())
    }
}
