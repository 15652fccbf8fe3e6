//! Filename derivation for downloaded documents.
//!
//! Names are derived from the URL alone, never from response headers, so the
//! destination is known before any request is made and an existing file can be
//! skipped without touching the network.

use std::path::{Path, PathBuf};

use super::constants::{DOCUMENT_EXTENSION, NOISE_TOKEN};

/// Maps a document URL to a filesystem-safe `.pdf` filename.
///
/// Steps, in order: lowercase; keep the final path segment (query and
/// fragment dropped, trailing `/` ignored); replace everything outside
/// `[a-z0-9]` with `_`; collapse `_` runs; trim `_` at both ends; delete every
/// `_pdf`; append `.pdf`.
///
/// The `_pdf` deletion applies anywhere in the name, so
/// `.../sae_pdf_sheet.pdf` becomes `sae_sheet.pdf`.
///
/// # Examples
///
/// ```
/// use harvester_core::download::sanitize_filename;
///
/// assert_eq!(sanitize_filename("https://cam2.com/product/x.pdf?v=2"), "x.pdf");
/// assert_eq!(sanitize_filename("https://cam2.com/SDS/Gear-Oil 80W.PDF"), "gear_oil_80w.pdf");
/// ```
#[must_use]
pub fn sanitize_filename(url: &str) -> String {
    // One char per char: `İ` must not expand to `i` plus a combining dot.
    let lower: String = url
        .chars()
        .map(|c| c.to_lowercase().next().unwrap_or(c))
        .collect();
    let segment = final_path_segment(&lower);

    let mut safe = String::with_capacity(segment.len() + DOCUMENT_EXTENSION.len());
    for ch in segment.chars() {
        let mapped = if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            ch
        } else {
            '_'
        };
        if mapped == '_' && safe.ends_with('_') {
            continue;
        }
        safe.push(mapped);
    }

    let mut safe = safe.trim_matches('_').replace(NOISE_TOKEN, "");

    if !safe.ends_with(DOCUMENT_EXTENSION) {
        safe.push_str(DOCUMENT_EXTENSION);
    }
    safe
}

/// Returns the destination path for `url` under `output_dir`.
#[must_use]
pub fn destination_path(output_dir: &Path, url: &str) -> PathBuf {
    output_dir.join(sanitize_filename(url).to_ascii_lowercase())
}

/// Text after the last `/` of the path part of `url`.
fn final_path_segment(url: &str) -> &str {
    let path_end = url.find(['?', '#']).unwrap_or(url.len());
    let path = url[..path_end].trim_end_matches('/');
    path.rsplit('/').next().unwrap_or(path)
}
