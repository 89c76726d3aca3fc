use serde::{Deserialize, Serialize};

/// Maximum number of distinct searches kept per session.
pub const HISTORY_CAPACITY: usize = 5;

/// Records `term` at the front of `history`.
///
/// A term already present leaves the history unchanged. The result never
/// holds more than [`HISTORY_CAPACITY`] entries.
pub fn record(history: &[String], term: &str) -> Vec<String> {
    if history.iter().any(|existing| existing == term) {
        return history.iter().take(HISTORY_CAPACITY).cloned().collect();
    }

    std::iter::once(term.to_string())
        .chain(history.iter().cloned())
        .take(HISTORY_CAPACITY)
        .collect()
}

/// Recent searches for one session, most recent first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchHistory(Vec<String>);

impl SearchHistory {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn record(&self, term: &str) -> Self {
        Self(record(&self.0, term))
    }

    pub fn entries(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<String>> for SearchHistory {
    fn from(entries: Vec<String>) -> Self {
        Self(entries.into_iter().take(HISTORY_CAPACITY).collect())
    }
}
