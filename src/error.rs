//! Error types for the lookup pipeline.
//!
//! Store and extraction problems never abort a lookup on their own: a
//! failed read is recovered as an empty store and a failed write is handed
//! back alongside the record. Only [`LookupError`] ends a lookup without a
//! result.

use std::path::PathBuf;

/// Record store read or write failure.
#[derive(Debug)]
pub enum StoreError {
    Read { path: PathBuf, reason: String },
    Write { path: PathBuf, reason: String },
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Read { path, reason } => {
                write!(f, "failed to read store {}: {}", path.display(), reason)
            }
            StoreError::Write { path, reason } => {
                write!(f, "failed to save store {}: {}", path.display(), reason)
            }
        }
    }
}

impl std::error::Error for StoreError {}

/// Transport or availability failure while retrieving a page.
#[derive(Debug)]
pub enum FetchError {
    Transport(String),
    Status { url: String, status: u16 },
    InvalidLocator(String),
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::Transport(e) => write!(f, "request failed: {}", e),
            FetchError::Status { url, status } => {
                write!(f, "{} returned HTTP {}", url, status)
            }
            FetchError::InvalidLocator(l) => write!(f, "invalid page locator: {}", l),
        }
    }
}

impl std::error::Error for FetchError {}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        FetchError::Transport(e.to_string())
    }
}

/// Outcomes of the disambiguation step that are not a chosen candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisambiguateError {
    /// The search page contained no recognisable results.
    NoResultsFound,
    /// The selection index was outside `0..=max`.
    InvalidSelection { choice: u32, max: u32 },
}

impl std::fmt::Display for DisambiguateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DisambiguateError::NoResultsFound => write!(f, "no search results found"),
            DisambiguateError::InvalidSelection { choice, max } => {
                write!(f, "selection {} is outside 0..={}", choice, max)
            }
        }
    }
}

impl std::error::Error for DisambiguateError {}

/// Failures that terminate a lookup without producing a record.
#[derive(Debug)]
pub enum LookupError {
    EmptyQuery,
    Fetch(FetchError),
    InvalidSelection { choice: u32, max: u32 },
}

impl std::fmt::Display for LookupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LookupError::EmptyQuery => write!(f, "please enter a movie name"),
            LookupError::Fetch(e) => write!(f, "lookup aborted: {}", e),
            LookupError::InvalidSelection { choice, max } => {
                write!(f, "invalid selection {} (expected 0..={})", choice, max)
            }
        }
    }
}

impl std::error::Error for LookupError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LookupError::Fetch(e) => Some(e),
            _ => None,
        }
    }
}

impl From<FetchError> for LookupError {
    fn from(e: FetchError) -> Self {
        LookupError::Fetch(e)
    }
}
