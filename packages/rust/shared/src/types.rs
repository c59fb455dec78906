//! Core domain types for the Reachout pipeline.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// One boolean search query built from a keyword sheet row.
///
/// `operator` is the normalized label ("AND" or "OR"); empty or unrecognized
/// sheet values are reported as "AND".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// The query text sent to the site's search endpoint.
    pub text: String,
    /// Normalized operator label.
    pub operator: String,
    /// The 1–3 keywords the query was built from, in sheet order.
    pub keywords: Vec<String>,
}

/// One collected search-result row, written verbatim to a per-query CSV.
///
/// `bio` and `followers` are placeholders at this stage; enrichment fills
/// them in later from the author's profile page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostRecord {
    pub username: String,
    pub url: String,
    pub bio: String,
    pub followers: u64,
    pub tweet_url: String,
    pub tweet_content: String,
    pub tweeted_at: String,
    pub query: String,
}

/// An enriched account: profile data plus the parsed follower count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub username: String,
    pub url: String,
    pub bio: String,
    pub followers: u64,
}

/// Parse a human-readable abbreviated follower count.
///
/// `"12,345"` → 12345, `"1.5K"` → 1500, `"2M"` → 2000000. Unparsable text
/// is recovered as 0 with a warning, never an error.
pub fn parse_follower_count(text: &str) -> u64 {
    let cleaned = text.trim().replace(',', "");

    let parsed = if cleaned.contains('K') {
        cleaned
            .replace('K', "")
            .parse::<f64>()
            .ok()
            .map(|v| (v * 1_000.0) as u64)
    } else if cleaned.contains('M') {
        cleaned
            .replace('M', "")
            .parse::<f64>()
            .ok()
            .map(|v| (v * 1_000_000.0) as u64)
    } else {
        cleaned.parse::<u64>().ok()
    };

    match parsed {
        Some(count) => count,
        None => {
            warn!(text, "could not parse follower count, defaulting to 0");
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_digits() {
        assert_eq!(parse_follower_count("42"), 42);
        assert_eq!(parse_follower_count("12,345"), 12_345);
    }

    #[test]
    fn thousands_abbreviation() {
        assert_eq!(parse_follower_count("1.5K"), 1_500);
        assert_eq!(parse_follower_count("12.3K"), 12_300);
        assert_eq!(parse_follower_count("999K"), 999_000);
    }

    #[test]
    fn millions_abbreviation() {
        assert_eq!(parse_follower_count("2M"), 2_000_000);
        assert_eq!(parse_follower_count("1.2M"), 1_200_000);
    }

    #[test]
    fn unparsable_defaults_to_zero() {
        assert_eq!(parse_follower_count("abc"), 0);
        assert_eq!(parse_follower_count(""), 0);
        // Decimal without an abbreviation is not a valid plain count.
        assert_eq!(parse_follower_count("12.5"), 0);
    }

    #[test]
    fn post_record_field_order_matches_result_columns() {
        // The CSV header is derived from the struct field order; the result
        // files must keep these eight columns in exactly this order.
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer
            .serialize(PostRecord {
                username: "alice".into(),
                url: "https://twitter.com/alice".into(),
                bio: String::new(),
                followers: 0,
                tweet_url: String::new(),
                tweet_content: String::new(),
                tweeted_at: String::new(),
                query: "cats".into(),
            })
            .expect("serialize");
        let out = String::from_utf8(writer.into_inner().expect("flush")).expect("utf8");
        assert!(out.starts_with(
            "username,url,bio,followers,tweet_url,tweet_content,tweeted_at,query\n"
        ));
    }
}
