//! Candidate link discovery and resolution.
//!
//! This module turns raw aggregate page text into absolute document URLs:
//!
//! 1. [`extract_links`] scans the text for `href="...pdf..."` values
//! 2. [`dedup`] drops repeats, keeping first-seen order
//! 3. [`resolve_candidate`] prefixes hostless candidates with the base domain
//!    and validates the result
//!
//! # Example
//!
//! ```
//! use harvester_core::parser::{dedup, extract_links, resolve_candidate};
//!
//! let html = r#"<a href="/sds/oil.pdf">SDS</a><a href="/sds/oil.pdf">again</a>"#;
//! let links = dedup(extract_links(html));
//! let urls: Vec<String> = links
//!     .iter()
//!     .filter_map(|link| resolve_candidate(link, "https://example.com").ok())
//!     .collect();
//! assert_eq!(urls, vec!["https://example.com/sds/oil.pdf".to_string()]);
//! ```

mod error;
mod links;
mod normalize;

pub use error::ParseError;
pub use links::{dedup, extract_links};
pub use normalize::{has_host, is_valid, resolve, resolve_candidate};
