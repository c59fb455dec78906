//! Flat-file storage layer: project layout and CSV I/O.
//!
//! Reachout deliberately has no database; every stage reads and writes
//! plain CSV files under the project root. This crate owns the directory
//! contract ([`ProjectLayout`]) and the CSV readers/writers ([`files`]).

pub mod files;
pub mod layout;

pub use files::{
    AccountRef, list_result_files, read_account_refs, read_keyword_sheet, read_profiles,
    read_usernames, write_posts, write_profiles,
};
pub use layout::ProjectLayout;
