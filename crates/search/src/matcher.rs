/// One marked occurrence of the query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchMatch<N> {
    pub marker: N,
    /// Matched text as it appears in the page, original case.
    pub text: String,
}

impl<N> SearchMatch<N> {
    pub fn new(marker: N, text: impl Into<String>) -> Self {
        Self {
            marker,
            text: text.into(),
        }
    }
}

/// Match count and 1-based active position (0 when nothing is active).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchStats {
    pub total: usize,
    pub current: usize,
}

impl SearchStats {
    pub fn new(total: usize, current: usize) -> Self {
        Self { total, current }
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

/// Matches in document order plus a cyclic cursor.
#[derive(Debug, Clone)]
pub struct SearchResults<N> {
    matches: Vec<SearchMatch<N>>,
    current_index: Option<usize>,
}

impl<N> Default for SearchResults<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> SearchResults<N> {
    pub fn new() -> Self {
        Self {
            matches: Vec::new(),
            current_index: None,
        }
    }

    pub fn from_matches(matches: Vec<SearchMatch<N>>) -> Self {
        let current_index = if matches.is_empty() { None } else { Some(0) };
        Self {
            matches,
            current_index,
        }
    }

    pub fn count(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn matches(&self) -> &[SearchMatch<N>] {
        &self.matches
    }

    pub fn get(&self, index: usize) -> Option<&SearchMatch<N>> {
        self.matches.get(index)
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    pub fn current(&self) -> Option<&SearchMatch<N>> {
        self.current_index.and_then(|i| self.matches.get(i))
    }

    pub fn position(&self) -> Option<(usize, usize)> {
        self.current_index.map(|i| (i + 1, self.matches.len()))
    }

    pub fn stats(&self) -> SearchStats {
        match self.position() {
            Some((current, total)) => SearchStats::new(total, current),
            None => SearchStats::new(self.matches.len(), 0),
        }
    }

    pub fn next(&mut self) -> Option<&SearchMatch<N>> {
        if self.matches.is_empty() {
            return None;
        }
        let next_index = match self.current_index {
            Some(i) => (i + 1) % self.matches.len(),
            None => 0,
        };
        self.current_index = Some(next_index);
        self.matches.get(next_index)
    }

    pub fn previous(&mut self) -> Option<&SearchMatch<N>> {
        if self.matches.is_empty() {
            return None;
        }
        let prev_index = match self.current_index {
            Some(i) => {
                if i == 0 {
                    self.matches.len() - 1
                } else {
                    i - 1
                }
            }
            None => self.matches.len() - 1,
        };
        self.current_index = Some(prev_index);
        self.matches.get(prev_index)
    }

    /// Empties the results, handing back the matches that were held.
    pub fn take(&mut self) -> Vec<SearchMatch<N>> {
        self.current_index = None;
        std::mem::take(&mut self.matches)
    }
}
