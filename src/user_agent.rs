//! Shared User-Agent string for page fetches and document downloads.
//!
//! Every request a harvest run makes carries the same identity header, so
//! page traffic and download traffic look identical to the remote site.

/// Browser identity sent with every fetch and download request.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/139.0.0.0 Safari/537.36";

/// Returns the default User-Agent as an owned string.
#[must_use]
pub fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}
