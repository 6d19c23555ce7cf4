//! Lookup orchestration.
//!
//! Coordinates the full lookup flow: store check → search → disambiguation
//! → detail fetch → extraction → persistence.
//!
//! ```text
//! CheckingStore ──hit──▶ Cached
//!      │miss
//!      ▼
//! Searching ──no links──▶ NoResults
//!      │
//!      ▼
//! Disambiguating ──0/none──▶ Cancelled
//!      │rank k
//!      ▼
//! FetchingDetail ─▶ Extracting ─▶ Persisting ─▶ Fetched
//! ```
//!
//! A fetch failure in `Searching` or `FetchingDetail` aborts with
//! [`LookupError::Fetch`] and nothing is written. A failed write in
//! `Persisting` does not abort: the record is still returned, with the
//! store error attached.

use reqwest::Url;

use crate::disambiguate::{parse_candidates, resolve_selection, Selection};
use crate::error::{DisambiguateError, LookupError, StoreError};
use crate::extract::extract_record;
use crate::fetch::PageFetcher;
use crate::models::MovieRecord;
use crate::progress::{LookupEvent, LookupReporter};
use crate::prompt::Prompter;
use crate::store::RecordStore;

/// Terminal, non-error result of a lookup.
#[derive(Debug)]
pub enum LookupOutcome {
    /// The store already held a record with this title.
    Cached { key: String, record: MovieRecord },
    /// The record was extracted from the source site. `persist_error` is
    /// set when writing it to the store failed.
    Fetched {
        key: String,
        record: MovieRecord,
        persist_error: Option<StoreError>,
    },
    /// The search page had no recognisable results.
    NoResults,
    /// The user declined to pick a candidate.
    Cancelled,
}

impl LookupOutcome {
    /// Display key and record, when the outcome carries one.
    pub fn record(&self) -> Option<(&str, &MovieRecord)> {
        match self {
            LookupOutcome::Cached { key, record } | LookupOutcome::Fetched { key, record, .. } => {
                Some((key.as_str(), record))
            }
            LookupOutcome::NoResults | LookupOutcome::Cancelled => None,
        }
    }
}

/// Collaborators for one or more lookups.
pub struct Lookup<'a> {
    pub store: &'a RecordStore,
    pub fetcher: &'a dyn PageFetcher,
    pub prompter: &'a dyn Prompter,
    pub reporter: &'a dyn LookupReporter,
    /// Origin used to resolve relative result links.
    pub base_url: &'a Url,
}

impl Lookup<'_> {
    /// Resolve `query` to a record, from the store if possible.
    pub async fn run(&self, query: &str) -> Result<LookupOutcome, LookupError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(LookupError::EmptyQuery);
        }

        self.reporter.report(LookupEvent::CheckingStore {
            query: query.to_string(),
        });
        if let Some((key, record)) = self.store.find(query) {
            self.reporter.report(LookupEvent::StoreHit { key: key.clone() });
            return Ok(LookupOutcome::Cached { key, record });
        }

        self.reporter.report(LookupEvent::Searching {
            query: query.to_string(),
        });
        let search_markup = self.fetcher.fetch_search_page(query).await?;

        let candidates = match parse_candidates(&search_markup, self.base_url, query) {
            Ok(candidates) => candidates,
            Err(e) => return stopped_at_disambiguation(e),
        };
        self.reporter.report(LookupEvent::CandidatesFound {
            count: candidates.len(),
        });

        let choice = self.prompter.prompt_selection(&candidates);
        let chosen = match resolve_selection(&candidates, choice) {
            Ok(Selection::Chosen(candidate)) => candidate.clone(),
            Ok(Selection::Cancelled) => return Ok(LookupOutcome::Cancelled),
            Err(e) => return stopped_at_disambiguation(e),
        };

        self.reporter.report(LookupEvent::FetchingDetail {
            locator: chosen.locator.clone(),
        });
        let detail_markup = self.fetcher.fetch_detail_page(&chosen.locator).await?;

        self.reporter.report(LookupEvent::Extracting);
        let record = extract_record(&detail_markup, &chosen);

        let key = chosen.title;
        self.reporter
            .report(LookupEvent::Persisting { key: key.clone() });
        let persist_error = match self.store.insert(&key, record.clone()) {
            Ok(()) => {
                self.reporter.report(LookupEvent::Saved { key: key.clone() });
                None
            }
            Err(e) => {
                self.reporter.report(LookupEvent::Warning {
                    message: e.to_string(),
                });
                Some(e)
            }
        };

        Ok(LookupOutcome::Fetched {
            key,
            record,
            persist_error,
        })
    }
}

/// Where a lookup ends when disambiguation yields no candidate: no results
/// is a normal outcome, a bad selection is an error.
fn stopped_at_disambiguation(e: DisambiguateError) -> Result<LookupOutcome, LookupError> {
    match e {
        DisambiguateError::NoResultsFound => Ok(LookupOutcome::NoResults),
        DisambiguateError::InvalidSelection { choice, max } => {
            Err(LookupError::InvalidSelection { choice, max })
        }
    }
}
