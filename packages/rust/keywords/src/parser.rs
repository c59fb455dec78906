//! Keyword sheet parsing: tabular rows → normalized search queries.
//!
//! The sheet's intended headers are `keyword1`, `keyword2`, `operator` and
//! an optional `keyword3`, but real sheets often arrive with missing or
//! mismatched headers, so each role falls back to a positional column.

use reachout_shared::SearchQuery;

/// Resolved column indexes for the four sheet roles.
struct Roles {
    keyword1: usize,
    keyword2: usize,
    operator: usize,
    keyword3: Option<usize>,
}

/// Resolve each role to a column: exact header match first, positional
/// fallback otherwise.
///
/// Positionally, keyword1 and keyword2 are the first two columns. The
/// operator lives in the 4th column when the sheet is wide enough to carry
/// a keyword3 (which then takes the 3rd); in a 3-column sheet the 3rd
/// column is the operator and there is no keyword3 slot. Returns `None`
/// when keyword1, keyword2 or the operator cannot be resolved at all.
fn resolve_roles(headers: &[String]) -> Option<Roles> {
    let find = |name: &str| headers.iter().position(|h| h.trim() == name);
    let width = headers.len();

    let keyword1 = find("keyword1").or(if width > 0 { Some(0) } else { None })?;
    let keyword2 = find("keyword2").or(if width > 1 { Some(1) } else { None })?;
    let operator = find("operator").or(match width {
        0..=2 => None,
        3 => Some(2),
        _ => Some(3),
    })?;
    let keyword3 = find("keyword3").or(if width > 3 { Some(2) } else { None });

    Some(Roles {
        keyword1,
        keyword2,
        operator,
        keyword3,
    })
}

/// Parse a keyword sheet into an ordered list of [`SearchQuery`].
///
/// Rows with an empty first keyword are skipped. An empty or unrecognized
/// operator gets AND semantics (site-search implicit AND: keywords joined
/// with a single space) and is reported as "AND". Unresolvable sheets
/// produce an empty list, not an error.
pub fn parse_keyword_sheet(headers: &[String], rows: &[Vec<String>]) -> Vec<SearchQuery> {
    let Some(roles) = resolve_roles(headers) else {
        return Vec::new();
    };

    let cell = |row: &Vec<String>, idx: usize| -> String {
        row.get(idx).map(|s| s.trim().to_string()).unwrap_or_default()
    };

    let mut queries = Vec::new();

    for row in rows {
        let kw1 = cell(row, roles.keyword1);
        if kw1.is_empty() {
            continue;
        }

        let mut keywords = vec![kw1];
        let kw2 = cell(row, roles.keyword2);
        if !kw2.is_empty() {
            keywords.push(kw2);
        }
        if let Some(idx) = roles.keyword3 {
            let kw3 = cell(row, idx);
            if !kw3.is_empty() {
                keywords.push(kw3);
            }
        }

        let raw_operator = cell(row, roles.operator).to_uppercase();
        let (text, operator) = match raw_operator.as_str() {
            "OR" => (keywords.join(" OR "), "OR".to_string()),
            // Empty and unknown operators both collapse to implicit AND.
            _ => (keywords.join(" "), "AND".to_string()),
        };

        queries.push(SearchQuery {
            text,
            operator,
            keywords,
        });
    }

    queries
}
