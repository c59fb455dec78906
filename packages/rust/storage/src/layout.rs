//! Project directory layout, rooted at the operator's working directory.
//!
//! Every stage resolves its inputs and outputs through this one struct so
//! the on-disk contract stays in a single place:
//!
//! ```text
//! <root>/config/keywords.csv          keyword sheet
//! <root>/result/<encoded>_<date>.csv  per-query search output
//! <root>/input/filtered_accounts.csv  enrichment output
//! <root>/dm/dm_template.txt           DM template
//! <root>/dm/generated/                per-account drafts
//! <root>/log/<date>/<date>.log        run logs
//! ```

use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct ProjectLayout {
    root: PathBuf,
}

impl ProjectLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn keywords_file(&self) -> PathBuf {
        self.root.join("config").join("keywords.csv")
    }

    pub fn result_dir(&self) -> PathBuf {
        self.root.join("result")
    }

    pub fn input_dir(&self) -> PathBuf {
        self.root.join("input")
    }

    pub fn filtered_accounts_file(&self) -> PathBuf {
        self.input_dir().join("filtered_accounts.csv")
    }

    pub fn template_file(&self) -> PathBuf {
        self.root.join("dm").join("dm_template.txt")
    }

    pub fn generated_dir(&self) -> PathBuf {
        self.root.join("dm").join("generated")
    }

    /// Per-account draft path for a given run date.
    pub fn draft_file(&self, username: &str, date: &str) -> PathBuf {
        self.generated_dir().join(format!("{username}_{date}.txt"))
    }

    /// Combined drafts file for a given run date.
    pub fn combined_drafts_file(&self, date: &str) -> PathBuf {
        self.generated_dir().join(format!("all_dms_{date}.txt"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_hang_off_root() {
        let layout = ProjectLayout::new("/work");
        assert_eq!(
            layout.keywords_file(),
            PathBuf::from("/work/config/keywords.csv")
        );
        assert_eq!(
            layout.filtered_accounts_file(),
            PathBuf::from("/work/input/filtered_accounts.csv")
        );
        assert_eq!(
            layout.draft_file("alice", "20260829"),
            PathBuf::from("/work/dm/generated/alice_20260829.txt")
        );
        assert_eq!(
            layout.combined_drafts_file("20260829"),
            PathBuf::from("/work/dm/generated/all_dms_20260829.txt")
        );
    }
}
