//! Match and search results

use std::fmt;

/// Outcome of a library search (`Search`, `HighSpeedSearch`, `Identify`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SearchResult {
    /// Library slot holding the matching template
    pub page_id: u16,

    /// Match score reported by the module
    pub score: u16,
}

impl SearchResult {
    pub fn new(page_id: u16, score: u16) -> Self {
        Self { page_id, score }
    }
}

impl fmt::Display for SearchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "page={} score={}", self.page_id, self.score)
    }
}
