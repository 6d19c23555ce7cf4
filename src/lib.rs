//! # Movie Finder
//!
//! A local-first movie lookup tool. Queries are answered from a JSON record
//! store when possible; unknown titles are searched on the source site, the
//! user picks the right result, and the detail page is scraped into a
//! structured record that is saved for next time.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   miss   ┌──────────┐   ┌──────────────┐   ┌───────────┐
//! │  Store   │────────▶│  Search   │──▶│ Disambiguate │──▶│  Extract  │
//! │  (JSON)  │          │  (fetch)  │   │  (prompt)    │   │  (fetch)  │
//! └────┬─────┘          └──────────┘   └──────────────┘   └─────┬─────┘
//!      │ hit                                                      │
//!      ▼                                                          ▼
//!  ┌────────┐                                              ┌───────────┐
//!  │ record │◀─────────────────────────────────────────────│  persist  │
//!  └────────┘                                              └───────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! movie-finder lookup "Inception"   # store first, then the web
//! movie-finder list                 # stored titles
//! movie-finder show "inception"     # store only
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Movie records and search candidates |
//! | [`error`] | Error types |
//! | [`store`] | JSON record store |
//! | [`disambiguate`] | Search-result parsing and selection |
//! | [`extract`] | Detail-page field extraction |
//! | [`fetch`] | Page retrieval |
//! | [`prompt`] | User interaction boundary |
//! | [`lookup`] | Lookup orchestration |
//! | [`menu`] | Record detail menu |
//! | [`progress`] | Progress reporting |

pub mod config;
pub mod disambiguate;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod lookup;
mod markup;
pub mod menu;
pub mod models;
pub mod progress;
pub mod prompt;
pub mod store;
