//! News view state.

use tradeai_core::api::{NewsCategory, NewsItem};

/// State for the AI-annotated news view.
#[derive(Debug, Default)]
pub struct NewsState {
    pub items: Vec<NewsItem>,
    pub selected: usize,
    /// Active category filter; `None` shows everything.
    pub category: Option<NewsCategory>,
    pub loading: bool,
    /// True once the first fetch has completed (even if empty).
    pub loaded: bool,
    pub error: Option<String>,
}

impl NewsState {
    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_next(&mut self) {
        if !self.items.is_empty() {
            self.selected = (self.selected + 1).min(self.items.len() - 1);
        }
    }

    pub fn selected_item(&self) -> Option<&NewsItem> {
        self.items.get(self.selected)
    }

    /// Advances the category filter: all -> bullish -> bearish -> neutral.
    pub fn cycle_category(&mut self) -> Option<NewsCategory> {
        self.category = match self.category {
            None => Some(NewsCategory::Bullish),
            Some(NewsCategory::Bullish) => Some(NewsCategory::Bearish),
            Some(NewsCategory::Bearish) => Some(NewsCategory::Neutral),
            Some(NewsCategory::Neutral) => None,
        };
        self.category
    }

    pub fn apply(&mut self, items: Vec<NewsItem>) {
        self.items = items;
        self.selected = 0;
        self.loading = false;
        self.loaded = true;
        self.error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_cycle_wraps() {
        let mut state = NewsState::default();
        assert_eq!(state.cycle_category(), Some(NewsCategory::Bullish));
        assert_eq!(state.cycle_category(), Some(NewsCategory::Bearish));
        assert_eq!(state.cycle_category(), Some(NewsCategory::Neutral));
        assert_eq!(state.cycle_category(), None);
    }

    #[test]
    fn test_selection_clamps_to_items() {
        let mut state = NewsState::default();
        state.select_next();
        assert_eq!(state.selected, 0);
        state.select_prev();
        assert_eq!(state.selected, 0);
    }
}
