//! Keyword sheet parsing and result-filename encoding/decoding.
//!
//! This crate provides:
//! - [`parser`] — keyword sheet rows → normalized [`SearchQuery`] list
//! - [`filename`] — deterministic result CSV naming and its lossy inverse
//!
//! [`SearchQuery`]: reachout_shared::SearchQuery

pub mod filename;
pub mod parser;

pub use filename::{decode_keywords, encode, encode_today};
pub use parser::parse_keyword_sheet;
