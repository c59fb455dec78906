//! The four pipeline stages.
//!
//! Data flows strictly one way:
//!
//! ```text
//! search → result/*.csv → enrich → input/filtered_accounts.csv
//!        → dm (drafts)  → send (human-gated)
//! ```
//!
//! Each stage is single-threaded and sequential; the only shared mutable
//! resource is the browser session, owned exclusively by the running stage.
//! Modeled aborts (missing inputs, login failure) log at error level and
//! return a summary rather than an `Err` — the process still exits 0,
//! matching the operator-tooling contract.

pub mod dm;
pub mod enrich;
pub mod search;
pub mod send;

pub(crate) mod selectors;

pub use dm::{DmSummary, generate_drafts};
pub use enrich::{EnrichSummary, enrich_profiles};
pub use search::{SearchSummary, run_searches};
pub use send::{SendSummary, launch_send_session};
