//! Deterministic result-file naming and its lossy inverse.
//!
//! The search stage encodes (keywords, operator, date) into the per-query
//! CSV filename; the DM generation stage later re-derives keyword
//! associations by decoding those names. The `"or"`/`"+"` separators are
//! not escaped, so a keyword that itself contains `or` or `+` decodes
//! ambiguously — a known limitation of the legacy encoding that this codec
//! deliberately preserves rather than silently fixes.

use chrono::Local;

/// Placeholder stem for an empty keyword list.
const UNSPECIFIED_STEM: &str = "未指定";

/// Characters that cannot appear in a filename, each replaced with `_`.
const FORBIDDEN: [char; 9] = ['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Encode keywords + operator + date into a result CSV filename.
///
/// Pure and deterministic: AND joins with `+`, OR joins with `or`, any
/// other operator falls back to `_`. The joined part is sanitized before
/// the `_<date>.csv` suffix is appended.
pub fn encode(keywords: &[String], operator: &str, date: &str) -> String {
    if keywords.is_empty() {
        return format!("{UNSPECIFIED_STEM}_{date}.csv");
    }

    let joined = match operator.to_uppercase().as_str() {
        "AND" => keywords.join("+"),
        "OR" => keywords.join("or"),
        _ => keywords.join("_"),
    };

    let sanitized: String = joined
        .chars()
        .map(|c| if FORBIDDEN.contains(&c) { '_' } else { c })
        .collect();

    format!("{sanitized}_{date}.csv")
}

/// Encode with today's date (`%Y%m%d`).
pub fn encode_today(keywords: &[String], operator: &str) -> String {
    encode(keywords, operator, &Local::now().format("%Y%m%d").to_string())
}

/// Decode keyword tokens from a result filename stem (no `.csv` suffix).
///
/// Splits on `_`, drops the trailing date segment, then per segment:
/// a segment containing `"or"` splits into multiple trimmed tokens, a
/// segment containing `"+"` becomes one token with `+` rendered as
/// `" AND "`, anything else is a token as-is. Best-effort: names not
/// produced by [`encode`] still yield some token split.
pub fn decode_keywords(stem: &str) -> Vec<String> {
    let parts: Vec<&str> = stem.split('_').collect();
    if parts.len() < 2 {
        tracing::warn!(stem, "result filename has no keyword segment");
        return Vec::new();
    }

    let mut keywords = Vec::new();
    for part in &parts[..parts.len() - 1] {
        if part.contains("or") {
            keywords.extend(part.split("or").map(|k| k.trim().to_string()));
        } else if part.contains('+') {
            keywords.push(part.replace('+', " AND "));
        } else {
            keywords.push(part.to_string());
        }
    }

    keywords
}
