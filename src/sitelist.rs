//! Site-list ingestion helpers.
//!
//! Spreadsheet and upload parsing belongs to the front ends; the core only
//! tokenizes delimited text and validates tokens.

use crate::domain::site::SiteId;

/// Result of tokenizing a delimited site-list text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SiteList {
    /// Valid site ids in the order they appeared.
    pub accepted: Vec<SiteId>,
    /// Raw tokens that failed validation, for the front end to report.
    pub rejected: Vec<String>,
}

/// Tokenize delimited text into site ids.
///
/// The text is comma-separated if any comma appears anywhere in it, else one
/// token per line. A token is accepted iff it is exactly 5 ASCII digits
/// after trimming; empty tokens are skipped, anything else is rejected.
pub fn parse_site_ids(text: &str) -> SiteList {
    let tokens: Vec<&str> = if text.contains(',') {
        text.split(',').collect()
    } else {
        text.lines().collect()
    };

    let mut list = SiteList::default();
    for token in tokens {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            continue;
        }
        match SiteId::parse(trimmed) {
            Ok(site_id) => list.accepted.push(site_id),
            Err(_) => list.rejected.push(trimmed.to_string()),
        }
    }
    list
}

/// Case-insensitive match for the spreadsheet column that carries site ids.
pub fn is_site_id_column(name: &str) -> bool {
    name.trim().eq_ignore_ascii_case("siteid")
}
