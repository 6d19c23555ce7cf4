//! Structured field extraction from a movie detail page.
//!
//! Each field has an ordered list of rules. Rules keyed on `data-testid`
//! attributes come first; rules keyed on generated class names or loose
//! href patterns come after them. The first rule that yields a non-empty
//! result wins and later rules are not consulted. A field with no hit
//! falls back to its sentinel, so [`extract_record`] is total: any input,
//! including empty or malformed markup, produces a complete record.

use scraper::Html;

use crate::markup::{non_empty_text, select_all, select_first, select_within, text_of};
use crate::models::{Candidate, MovieRecord, MAX_CAST, NOT_AVAILABLE};

/// A rule producing a scalar field value, or `None` when it does not apply.
pub type TextRule = fn(&Html) -> Option<String>;

/// A rule producing a list field value; empty when it does not apply.
pub type ListRule = fn(&Html) -> Vec<String>;

pub const TITLE_RULES: &[TextRule] = &[title_from_hero_heading];
pub const YEAR_RULES: &[TextRule] = &[year_from_release_date];
pub const RATING_RULES: &[TextRule] = &[rating_from_aggregate_score, rating_from_badge_class];
pub const GENRE_RULES: &[ListRule] = &[genres_from_chips, genres_from_search_links];
pub const CERTIFICATE_RULES: &[TextRule] = &[certificate_from_details];
pub const DESCRIPTION_RULES: &[TextRule] = &[plot_long, plot_extra_long];
pub const CAST_RULES: &[ListRule] = &[cast_from_items];

/// Apply scalar rules in order; the first non-empty result wins.
pub fn first_text(doc: &Html, rules: &[TextRule]) -> Option<String> {
    rules
        .iter()
        .find_map(|rule| rule(doc).filter(|value| !value.trim().is_empty()))
}

/// Apply list rules in order; the first non-empty result wins.
pub fn first_list(doc: &Html, rules: &[ListRule]) -> Vec<String> {
    rules
        .iter()
        .map(|rule| rule(doc))
        .find(|values| !values.is_empty())
        .unwrap_or_default()
}

/// Build a record from detail-page markup.
///
/// `fallback` is the candidate the page was reached through; its title is
/// used only when the page itself has no title heading.
pub fn extract_record(markup: &str, fallback: &Candidate) -> MovieRecord {
    let doc = Html::parse_document(markup);

    let title = first_text(&doc, TITLE_RULES)
        .or_else(|| Some(fallback.title.trim().to_string()).filter(|t| !t.is_empty()))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());
    let (directors, writers) = principal_credits(&doc);
    let mut cast = first_list(&doc, CAST_RULES);
    cast.truncate(MAX_CAST);

    MovieRecord {
        title,
        year: scalar(&doc, YEAR_RULES),
        rating: scalar(&doc, RATING_RULES),
        genres: first_list(&doc, GENRE_RULES),
        directors,
        writers,
        cast,
        certificate: scalar(&doc, CERTIFICATE_RULES),
        description: scalar(&doc, DESCRIPTION_RULES),
    }
}

fn scalar(doc: &Html, rules: &[TextRule]) -> String {
    first_text(doc, rules).unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

fn first_text_of(doc: &Html, css: &str) -> Option<String> {
    select_first(doc, css).and_then(non_empty_text)
}

fn title_from_hero_heading(doc: &Html) -> Option<String> {
    first_text_of(doc, r#"h1[data-testid="hero-title-block__title"]"#)
}

/// Last whitespace token of the release-date link text.
fn year_from_release_date(doc: &Html) -> Option<String> {
    let text = first_text_of(doc, r#"a[data-testid="title-details-releasedate"]"#)?;
    text.split_whitespace().last().map(str::to_string)
}

fn rating_from_aggregate_score(doc: &Html) -> Option<String> {
    let text = first_text_of(
        doc,
        r#"span[data-testid="hero-rating-bar__aggregate-rating__score"]"#,
    )?;
    text.split('/').next().map(|s| s.trim().to_string())
}

fn rating_from_badge_class(doc: &Html) -> Option<String> {
    first_text_of(doc, r#"span[class*="AggregateRatingButton__RatingScore"]"#)
}

fn genres_from_chips(doc: &Html) -> Vec<String> {
    match select_first(doc, r#"div[data-testid="genres"]"#) {
        Some(section) => select_within(section, "span.ipc-chip__text")
            .into_iter()
            .filter_map(non_empty_text)
            .collect(),
        None => Vec::new(),
    }
}

fn genres_from_search_links(doc: &Html) -> Vec<String> {
    select_all(doc, r#"a[href*="/search/title?genres="]"#)
        .into_iter()
        .filter_map(non_empty_text)
        .collect()
}

fn certificate_from_details(doc: &Html) -> Option<String> {
    first_text_of(doc, r#"span[data-testid="title-details-certificate"]"#)
}

fn plot_long(doc: &Html) -> Option<String> {
    first_text_of(doc, r#"span[data-testid="plot-l"]"#)
}

fn plot_extra_long(doc: &Html) -> Option<String> {
    first_text_of(doc, r#"span[data-testid="plot-xl"]"#)
}

fn cast_from_items(doc: &Html) -> Vec<String> {
    select_all(doc, r#"div[data-testid="title-cast-item"]"#)
        .into_iter()
        .filter_map(|item| {
            select_within(item, r#"a[data-testid="title-cast-item__actor"]"#)
                .into_iter()
                .next()
                .and_then(non_empty_text)
        })
        .take(MAX_CAST)
        .collect()
}

/// Directors and writers from the principal-credit list.
///
/// Each credit item is classified by its label text: "Director" fills
/// `directors`, "Writer" fills `writers`. When a page repeats a role's
/// block, the last one wins.
fn principal_credits(doc: &Html) -> (Vec<String>, Vec<String>) {
    let mut directors = Vec::new();
    let mut writers = Vec::new();

    for credit in select_all(doc, r#"li[data-testid="title-pc-principal-credit"]"#) {
        let Some(label) = select_within(credit, "span.ipc-metadata-list-item__label")
            .into_iter()
            .next()
        else {
            continue;
        };
        let label = text_of(label);
        let names: Vec<String> = select_within(credit, "a")
            .into_iter()
            .filter_map(non_empty_text)
            .collect();

        if label.contains("Director") {
            directors = names;
        } else if label.contains("Writer") {
            writers = names;
        }
    }

    (directors, writers)
}
