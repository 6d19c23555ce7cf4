//! Lookup progress reporting.
//!
//! Reports each step of a lookup (store check, search, candidate count,
//! detail fetch, extraction, persistence) so users can see where time goes
//! and why a lookup ended the way it did. Progress is emitted on
//! **stderr** so stdout stays parseable for scripts.

use std::io::Write;

/// A single progress event for a lookup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LookupEvent {
    /// Looking the query up in the local store.
    CheckingStore { query: String },
    /// The store already had a matching record.
    StoreHit { key: String },
    /// Fetching the search-results page.
    Searching { query: String },
    /// Search page parsed into `count` candidates.
    CandidatesFound { count: usize },
    /// Fetching the chosen candidate's detail page.
    FetchingDetail { locator: String },
    /// Extracting fields from the detail page.
    Extracting,
    /// Writing the new record to the store.
    Persisting { key: String },
    /// Record written.
    Saved { key: String },
    /// Something non-fatal went wrong.
    Warning { message: String },
}

/// Receives lookup progress. Implementations write to stderr (human or JSON).
pub trait LookupReporter: Send + Sync {
    /// Emit a progress event. Called from the lookup orchestrator.
    fn report(&self, event: LookupEvent);
}

/// Human-friendly progress on stderr: "lookup  searching  'dune'".
pub struct StderrProgress;

impl LookupReporter for StderrProgress {
    fn report(&self, event: LookupEvent) {
        let line = format!("lookup  {}\n", describe(&event));
        let _ = std::io::stderr().lock().write_all(line.as_bytes());
        let _ = std::io::stderr().lock().flush();
    }
}

/// Machine-readable progress: one JSON object per line on stderr.
pub struct JsonProgress;

impl LookupReporter for JsonProgress {
    fn report(&self, event: LookupEvent) {
        let obj = to_json(&event);
        if let Ok(line) = serde_json::to_string(&obj) {
            let _ = writeln!(std::io::stderr().lock(), "{}", line);
            let _ = std::io::stderr().lock().flush();
        }
    }
}

/// No-op reporter when progress is disabled.
pub struct NoProgress;

impl LookupReporter for NoProgress {
    fn report(&self, _event: LookupEvent) {}
}

fn describe(event: &LookupEvent) -> String {
    match event {
        LookupEvent::CheckingStore { query } => format!("checking store  '{}'", query),
        LookupEvent::StoreHit { key } => format!("found in store  '{}'", key),
        LookupEvent::Searching { query } => format!("searching  '{}'", query),
        LookupEvent::CandidatesFound { count } => {
            let plural = if *count == 1 { "" } else { "s" };
            format!("{} candidate{}", count, plural)
        }
        LookupEvent::FetchingDetail { locator } => format!("fetching  {}", locator),
        LookupEvent::Extracting => "extracting fields".to_string(),
        LookupEvent::Persisting { key } => format!("saving  '{}'", key),
        LookupEvent::Saved { key } => format!("saved  '{}'", key),
        LookupEvent::Warning { message } => format!("warning  {}", message),
    }
}

fn to_json(event: &LookupEvent) -> serde_json::Value {
    match event {
        LookupEvent::CheckingStore { query } => serde_json::json!({
            "event": "progress",
            "phase": "checking_store",
            "query": query
        }),
        LookupEvent::StoreHit { key } => serde_json::json!({
            "event": "progress",
            "phase": "store_hit",
            "key": key
        }),
        LookupEvent::Searching { query } => serde_json::json!({
            "event": "progress",
            "phase": "searching",
            "query": query
        }),
        LookupEvent::CandidatesFound { count } => serde_json::json!({
            "event": "progress",
            "phase": "disambiguating",
            "candidates": count
        }),
        LookupEvent::FetchingDetail { locator } => serde_json::json!({
            "event": "progress",
            "phase": "fetching_detail",
            "locator": locator
        }),
        LookupEvent::Extracting => serde_json::json!({
            "event": "progress",
            "phase": "extracting"
        }),
        LookupEvent::Persisting { key } => serde_json::json!({
            "event": "progress",
            "phase": "persisting",
            "key": key
        }),
        LookupEvent::Saved { key } => serde_json::json!({
            "event": "progress",
            "phase": "saved",
            "key": key
        }),
        LookupEvent::Warning { message } => serde_json::json!({
            "event": "warning",
            "message": message
        }),
    }
}

/// Progress mode for the CLI: off, human (stderr), or JSON (stderr).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ProgressMode {
    Off,
    Human,
    Json,
}

impl ProgressMode {
    /// Default: human progress when stderr is a TTY, otherwise off.
    pub fn default_for_tty() -> Self {
        if atty::is(atty::Stream::Stderr) {
            ProgressMode::Human
        } else {
            ProgressMode::Off
        }
    }

    /// Parse a `--progress` value (`off`, `human`, `json`).
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "off" => Some(ProgressMode::Off),
            "human" => Some(ProgressMode::Human),
            "json" => Some(ProgressMode::Json),
            _ => None,
        }
    }

    /// Build a reporter for this mode. Caller passes it to the lookup.
    pub fn reporter(&self) -> Box<dyn LookupReporter> {
        match self {
            ProgressMode::Off => Box::new(NoProgress),
            ProgressMode::Human => Box::new(StderrProgress),
            ProgressMode::Json => Box::new(JsonProgress),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_modes() {
        assert_eq!(ProgressMode::parse("off"), Some(ProgressMode::Off));
        assert_eq!(ProgressMode::parse("human"), Some(ProgressMode::Human));
        assert_eq!(ProgressMode::parse("json"), Some(ProgressMode::Json));
        assert_eq!(ProgressMode::parse("loud"), None);
    }

    #[test]
    fn candidate_count_pluralizes() {
        assert_eq!(describe(&LookupEvent::CandidatesFound { count: 1 }), "1 candidate");
        assert_eq!(describe(&LookupEvent::CandidatesFound { count: 3 }), "3 candidates");
    }

    #[test]
    fn json_event_has_phase() {
        let obj = to_json(&LookupEvent::Searching {
            query: "dune".to_string(),
        });
        assert_eq!(obj["phase"], "searching");
        assert_eq!(obj["query"], "dune");
        assert_eq!(to_json(&LookupEvent::Extracting)["event"], "progress");
    }
}
