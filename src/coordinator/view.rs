//! State published to the presentation layer

use crate::passes::PassRecord;
use std::sync::Arc;

/// Read-only snapshot of what should be on screen
#[derive(Debug, Clone, PartialEq)]
pub struct SearchView {
    /// True until the first fetch has completed
    pub loading: bool,
    /// True while a fetch issued for a non-empty query is in flight
    pub searching: bool,
    /// Query the results were computed for
    pub query: String,
    pub results: Arc<Vec<PassRecord>>,
    /// Sequence token of the fetch that produced `results`, 0 before any
    pub generation: u64,
}

impl SearchView {
    pub fn initial() -> Self {
        Self {
            loading: true,
            searching: false,
            query: String::new(),
            results: Arc::new(Vec::new()),
            generation: 0,
        }
    }
}
