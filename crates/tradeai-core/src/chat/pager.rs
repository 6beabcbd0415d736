//! Single-flight history pager.
//!
//! Tracks how much of a conversation's history is loaded and guards
//! `loadOlder` so only one page fetch is in flight at a time.

/// Default number of messages per history page.
pub const DEFAULT_PAGE_SIZE: usize = 30;

/// Pagination state for one conversation's history.
#[derive(Debug, Clone)]
pub struct HistoryPager {
    page_size: usize,
    /// Count of server-fetched messages (the next page's offset).
    loaded: usize,
    has_more: bool,
    loading: bool,
}

impl HistoryPager {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size,
            loaded: 0,
            has_more: true,
            loading: false,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    /// True when an older-page load may start.
    pub fn can_load_older(&self) -> bool {
        self.has_more && !self.loading
    }

    /// Records the initial page load.
    pub fn reset(&mut self, loaded: usize, has_more: bool) {
        self.loaded = loaded;
        self.has_more = has_more;
        self.loading = false;
    }

    /// Starts an older-page load, returning the fetch offset.
    ///
    /// Returns `None` when a load is already in flight or history is
    /// exhausted (the single-flight guard).
    pub fn begin(&mut self) -> Option<usize> {
        if !self.can_load_older() {
            return None;
        }
        self.loading = true;
        Some(self.loaded)
    }

    /// Completes a load with the number of messages received.
    pub fn complete(&mut self, received: usize, has_more: bool) {
        self.loading = false;
        self.loaded += received;
        self.has_more = has_more;
    }

    /// Aborts a failed load; already-loaded messages are untouched and the
    /// user may re-trigger by scrolling again.
    pub fn fail(&mut self) {
        self.loading = false;
    }
}

impl Default for HistoryPager {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_returns_current_offset() {
        let mut pager = HistoryPager::new(30);
        pager.reset(30, true);
        assert_eq!(pager.begin(), Some(30));
    }

    #[test]
    fn test_begin_is_single_flight() {
        let mut pager = HistoryPager::new(30);
        pager.reset(30, true);
        assert!(pager.begin().is_some());
        assert_eq!(pager.begin(), None);
        pager.complete(30, true);
        assert_eq!(pager.begin(), Some(60));
    }

    #[test]
    fn test_exhausted_history_stops_loading() {
        let mut pager = HistoryPager::new(30);
        pager.reset(10, false);
        assert!(!pager.can_load_older());
        assert_eq!(pager.begin(), None);
    }

    #[test]
    fn test_fail_releases_guard_without_advancing() {
        let mut pager = HistoryPager::new(30);
        pager.reset(30, true);
        assert_eq!(pager.begin(), Some(30));
        pager.fail();
        // Retry fetches the same offset.
        assert_eq!(pager.begin(), Some(30));
    }
}
