use std::time::Instant;

use super::*;

impl PageView {
    /// Schedules a search for the current input. Clearing the input takes
    /// effect at once.
    pub(super) fn handle_search_input_changed(&mut self, now: Instant) {
        if self.query.trim().is_empty() {
            self.pending_search_at = None;
            self.engine.clear_highlights();
            self.stats = SearchStats::default();
            self.layout_dirty = true;
            return;
        }
        self.pending_search_at = Some(now + self.search_debounce);
    }

    /// Runs the scheduled search once its deadline has passed.
    pub(super) fn run_due_search(&mut self, now: Instant) {
        if let Some(deadline) = self.pending_search_at
            && now >= deadline
        {
            self.pending_search_at = None;
            self.perform_search();
        }
    }

    pub(super) fn perform_search(&mut self) {
        self.stats = self.engine.search(&self.query);
        self.layout_dirty = true;
        if self.stats.is_empty() {
            log::debug!("no matches for {:?}", self.query);
        }
    }

    /// Runs a scheduled search now. Returns whether one was pending.
    fn flush_pending_search(&mut self) -> bool {
        if self.pending_search_at.take().is_some() {
            self.perform_search();
            return true;
        }
        false
    }

    /// A pending search lands on its first match instead of stepping past it.
    pub(super) fn search_next(&mut self) {
        if self.flush_pending_search() || self.stats.is_empty() {
            return;
        }

        self.stats = self.engine.navigate_next();
        self.layout_dirty = true;
    }

    pub(super) fn search_previous(&mut self) {
        if self.flush_pending_search() || self.stats.is_empty() {
            return;
        }

        self.stats = self.engine.navigate_previous();
        self.layout_dirty = true;
    }

    pub(super) fn clear_search(&mut self) {
        self.query.clear();
        self.handle_search_input_changed(Instant::now());
    }
}
