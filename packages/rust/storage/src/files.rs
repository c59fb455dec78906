//! Flat-file CSV persistence for the pipeline stages.
//!
//! All files are UTF-8 CSV with a header row. Readers that feed later
//! stages are tolerant: column lookup is by header name, extra columns are
//! ignored, and ragged rows read as empty cells.

use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, Writer};
use serde::Deserialize;

use reachout_shared::{PostRecord, ProfileRecord, ReachoutError, Result};

/// A bare (username, profile url) pair pulled from a result CSV.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountRef {
    pub username: String,
    pub url: String,
}

fn csv_err(path: &Path, e: csv::Error) -> ReachoutError {
    ReachoutError::Csv(format!("{}: {e}", path.display()))
}

/// Read the raw keyword sheet: header row plus data rows as strings.
///
/// No role interpretation happens here; that's the keyword parser's job.
pub fn read_keyword_sheet(path: &Path) -> Result<(Vec<String>, Vec<Vec<String>>)> {
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|e| csv_err(path, e))?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| csv_err(path, e))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| csv_err(path, e))?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok((headers, rows))
}

/// Write one query's collected posts to its result CSV.
pub fn write_posts(path: &Path, posts: &[PostRecord]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ReachoutError::io(parent, e))?;
    }

    let mut writer = Writer::from_path(path).map_err(|e| csv_err(path, e))?;
    for post in posts {
        writer.serialize(post).map_err(|e| csv_err(path, e))?;
    }
    writer
        .flush()
        .map_err(|e| ReachoutError::io(path, e))?;
    Ok(())
}

/// Read (username, url) pairs from a result CSV.
///
/// Errors when the file lacks a `username` or `url` column so the caller
/// can skip the file with a warning.
pub fn read_account_refs(path: &Path) -> Result<Vec<AccountRef>> {
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|e| csv_err(path, e))?;

    let headers = reader.headers().map_err(|e| csv_err(path, e))?.clone();
    let username_idx = headers
        .iter()
        .position(|h| h == "username")
        .ok_or_else(|| ReachoutError::Csv(format!("{}: missing username column", path.display())))?;
    let url_idx = headers
        .iter()
        .position(|h| h == "url")
        .ok_or_else(|| ReachoutError::Csv(format!("{}: missing url column", path.display())))?;

    let mut refs = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| csv_err(path, e))?;
        let username = record.get(username_idx).unwrap_or("").to_string();
        let url = record.get(url_idx).unwrap_or("").to_string();
        if !username.is_empty() {
            refs.push(AccountRef { username, url });
        }
    }

    Ok(refs)
}

/// Read the unique usernames appearing in a result CSV, in file order.
pub fn read_usernames(path: &Path) -> Result<Vec<String>> {
    let refs = read_account_refs(path)?;
    let mut seen = std::collections::HashSet::new();
    Ok(refs
        .into_iter()
        .map(|r| r.username)
        .filter(|u| seen.insert(u.clone()))
        .collect())
}

/// Overwrite the filtered-accounts CSV with the kept profiles.
pub fn write_profiles(path: &Path, profiles: &[ProfileRecord]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ReachoutError::io(parent, e))?;
    }

    let mut writer = Writer::from_path(path).map_err(|e| csv_err(path, e))?;
    for profile in profiles {
        writer.serialize(profile).map_err(|e| csv_err(path, e))?;
    }
    writer
        .flush()
        .map_err(|e| ReachoutError::io(path, e))?;
    Ok(())
}

/// Read the filtered-accounts CSV back, preserving file order.
pub fn read_profiles(path: &Path) -> Result<Vec<ProfileRecord>> {
    let mut reader = ReaderBuilder::new()
        .from_path(path)
        .map_err(|e| csv_err(path, e))?;

    let mut profiles = Vec::new();
    for record in reader.deserialize() {
        profiles.push(record.map_err(|e| csv_err(path, e))?);
    }
    Ok(profiles)
}

/// List the CSV files under the result directory, sorted by name.
///
/// Returns an empty list when the directory does not exist yet.
pub fn list_result_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let entries = std::fs::read_dir(dir).map_err(|e| ReachoutError::io(dir, e))?;
    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "csv"))
        .collect();
    files.sort();
    Ok(files)
}
