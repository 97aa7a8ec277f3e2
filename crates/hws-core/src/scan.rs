//! The whitespace scanner.
//!
//! Two patterns, both searched over the whole buffer text:
//!
//! | Pattern  | Matches                          | Region set          |
//! |----------|----------------------------------|---------------------|
//! | `" {2,}"`| runs of two or more spaces       | [`RegionKey::Spaces`] |
//! | `"\t+"`  | runs of one or more tabs         | [`RegionKey::Tabs`]   |
//!
//! Both quantifiers are greedy and matches never overlap, so every region is
//! a maximal run. A single space between words never qualifies.
//!
//! [`should_scan`] is the gate applied before any scan: oversized buffers and
//! search-results views are left alone.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::config::Config;
use crate::region::{Region, RegionKey};

/// Runs of two or more spaces.
pub static SPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(" {2,}").expect("space-run pattern is valid"));

/// Runs of one or more tabs.
pub static TAB_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("\t+").expect("tab-run pattern is valid"));

/// Syntax-name fragment identifying the host's search-results view.
pub const FIND_RESULTS_SYNTAX: &str = "Find Results";

/// The pattern that feeds a region set.
#[must_use]
pub fn pattern(key: RegionKey) -> &'static Regex {
    match key {
        RegionKey::Spaces => &*SPACE_RUN,
        RegionKey::Tabs => &*TAB_RUN,
    }
}

// ---------------------------------------------------------------------------
// Gate
// ---------------------------------------------------------------------------

/// Why a buffer was not scanned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Skip {
    /// The buffer is larger than `max_file_size`.
    TooLarge { size: u64, max: u64 },
    /// The buffer is a search-results view.
    SearchResults,
}

impl fmt::Display for Skip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooLarge { size, max } => {
                write!(f, "buffer is {size} bytes, limit is {max}")
            }
            Self::SearchResults => f.write_str("search results view"),
        }
    }
}

/// True when `syntax` names the search-results syntax.
#[inline]
#[must_use]
pub fn is_find_results(syntax: Option<&str>) -> bool {
    syntax.is_some_and(|s| s.contains(FIND_RESULTS_SYNTAX))
}

/// Decide whether a buffer of `size` bytes with the given syntax should be
/// scanned. A buffer exactly at the limit is scanned.
///
/// # Errors
///
/// Returns the [`Skip`] reason when the buffer must be left untouched.
pub fn should_scan(size: u64, syntax: Option<&str>, config: &Config) -> Result<(), Skip> {
    if size > config.max_file_size {
        return Err(Skip::TooLarge {
            size,
            max: config.max_file_size,
        });
    }
    if is_find_results(syntax) {
        return Err(Skip::SearchResults);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Matching
// ---------------------------------------------------------------------------

/// All non-overlapping matches of `pattern` in `text`, as char-offset regions
/// in document order.
#[must_use]
pub fn find_all(text: &str, pattern: &Regex) -> Vec<Region> {
    let mut regions = Vec::new();
    // Matches arrive in order, so the byte-to-char conversion only ever walks
    // forward from the end of the previous match.
    let mut byte_cursor = 0;
    let mut char_cursor = 0;
    for m in pattern.find_iter(text) {
        char_cursor += text[byte_cursor..m.start()].chars().count();
        let len = m.as_str().chars().count();
        regions.push(Region::at(char_cursor, len));
        char_cursor += len;
        byte_cursor = m.end();
    }
    regions
}

/// The result of scanning one buffer: one region list per region set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scan {
    pub spaces: Vec<Region>,
    pub tabs: Vec<Region>,
}

impl Scan {
    /// The regions for one region set.
    #[inline]
    #[must_use]
    pub fn regions(&self, key: RegionKey) -> &[Region] {
        match key {
            RegionKey::Spaces => &self.spaces,
            RegionKey::Tabs => &self.tabs,
        }
    }

    /// True when neither pattern matched.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.spaces.is_empty() && self.tabs.is_empty()
    }
}

/// Scan `text` for both whitespace patterns.
#[must_use]
pub fn scan(text: &str) -> Scan {
    Scan {
        spaces: find_all(text, pattern(RegionKey::Spaces)),
        tabs: find_all(text, pattern(RegionKey::Tabs)),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
