use crate::matcher::{SearchMatch, SearchResults, SearchStats};

/// Manages the search session lifecycle
#[derive(Debug, Clone)]
pub struct SearchSession<N> {
    query: String,
    results: SearchResults<N>,
}

impl<N> Default for SearchSession<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> SearchSession<N> {
    pub fn new() -> Self {
        Self {
            query: String::new(),
            results: SearchResults::new(),
        }
    }

    /// Start a session for `query`; the first match, if any, is current
    pub fn begin(&mut self, query: &str, matches: Vec<SearchMatch<N>>) {
        self.query = query.to_string();
        self.results = SearchResults::from_matches(matches);
    }

    /// End the session, returning the matches it held
    pub fn reset(&mut self) -> Vec<SearchMatch<N>> {
        self.query.clear();
        self.results.take()
    }

    /// Normalized query of the running session, empty when idle
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn results(&self) -> &SearchResults<N> {
        &self.results
    }

    /// Get mutable search results (for navigation)
    pub fn results_mut(&mut self) -> &mut SearchResults<N> {
        &mut self.results
    }

    pub fn stats(&self) -> SearchStats {
        self.results.stats()
    }
}
