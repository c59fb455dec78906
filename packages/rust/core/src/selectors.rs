//! CSS selectors for the target site's rendered DOM.
//!
//! The site ships no stable public markup contract; these `data-testid`
//! hooks are the least volatile anchors available and are kept in one
//! place so a frontend change is a one-file fix.

/// One search-result row.
pub const RESULT_ROW: &str = "article";

/// Author link inside a result row; the href's last path segment is the
/// username.
pub const AUTHOR_LINK: &str = r#"div[data-testid="User-Name"] a"#;

/// Permalink of the post itself.
pub const POST_LINK: &str = r#"a[href*="/status/"]"#;

/// Post body text.
pub const POST_TEXT: &str = r#"div[data-testid="tweetText"]"#;

/// Post timestamp element (ISO datetime in the `datetime` attribute).
pub const POST_TIME: &str = "time";

/// Main content region of a profile page.
pub const PRIMARY_COLUMN: &str = r#"div[data-testid="primaryColumn"]"#;

/// Follower-count text on a profile page.
pub const FOLLOWER_COUNT: &str = r#"a[href$="/followers"] span span"#;

/// Profile bio text.
pub const BIO: &str = r#"div[data-testid="UserDescription"]"#;

/// DM entry point on a profile page.
pub const DM_BUTTON: &str = r#"a[href$="/message"] span span"#;

/// The message compose drawer.
pub const DM_DRAWER: &str = r#"div[data-testid="DMDrawer"]"#;

/// Close control inside the compose drawer.
pub const DM_CLOSE: &str = r#"div[data-testid="DMDrawer"] div[role="button"]"#;
