//! Chat scroll controller.
//!
//! Two modes: follow-latest (stick to the newest message) and anchored (the
//! user scrolled; offset is a line index from the top). Pagination merges
//! shift the anchored offset by the prepended height so the visible content
//! does not jump; new-message merges re-enter follow mode only when the
//! viewport was already near the bottom.

/// Lines from the top within which an upward page load triggers.
pub const TOP_TRIGGER_LINES: usize = 3;

/// Lines from the bottom within which an appended message re-engages
/// follow mode.
pub const BOTTOM_STICKY_LINES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollMode {
    /// Auto-scroll to show the latest content.
    FollowLatest,
    /// User scrolled manually; offset is a line index from the top.
    Anchored { offset: usize },
}

/// Scroll state for the chat transcript.
#[derive(Debug, Clone)]
pub struct ScrollState {
    pub mode: ScrollMode,
    /// Total line count from the last render.
    pub cached_line_count: usize,
}

impl Default for ScrollState {
    fn default() -> Self {
        Self {
            mode: ScrollMode::FollowLatest,
            cached_line_count: 0,
        }
    }
}

impl ScrollState {
    pub fn is_following(&self) -> bool {
        matches!(self.mode, ScrollMode::FollowLatest)
    }

    /// Current scroll offset for rendering, clamped to the content.
    pub fn get_offset(&self, viewport_height: usize) -> usize {
        let max_offset = self.cached_line_count.saturating_sub(viewport_height);
        match self.mode {
            ScrollMode::FollowLatest => max_offset,
            ScrollMode::Anchored { offset } => offset.min(max_offset),
        }
    }

    pub fn scroll_up(&mut self, lines: usize, viewport_height: usize) {
        let offset = self.get_offset(viewport_height).saturating_sub(lines);
        self.mode = ScrollMode::Anchored { offset };
    }

    /// Scrolls down, re-entering follow mode at the bottom.
    pub fn scroll_down(&mut self, lines: usize, viewport_height: usize) {
        if self.is_following() {
            return;
        }
        let max_offset = self.cached_line_count.saturating_sub(viewport_height);
        let offset = (self.get_offset(viewport_height) + lines).min(max_offset);
        if offset >= max_offset {
            self.mode = ScrollMode::FollowLatest;
        } else {
            self.mode = ScrollMode::Anchored { offset };
        }
    }

    pub fn scroll_to_bottom(&mut self) {
        self.mode = ScrollMode::FollowLatest;
    }

    /// Shifts an anchored offset by the height of freshly prepended content
    /// so the lines on screen stay put. No-op in follow mode.
    pub fn adjust_for_prepended(&mut self, added_lines: usize) {
        if let ScrollMode::Anchored { offset } = self.mode {
            self.mode = ScrollMode::Anchored {
                offset: offset + added_lines,
            };
        }
    }

    /// True when the viewport is close enough to the top to page upward.
    pub fn near_top(&self, viewport_height: usize) -> bool {
        !self.is_following() && self.get_offset(viewport_height) <= TOP_TRIGGER_LINES
    }

    /// True when an appended message should keep the view pinned to the
    /// bottom (the auto-scroll policy's "already near the bottom" test).
    pub fn near_bottom(&self, viewport_height: usize) -> bool {
        if self.is_following() {
            return true;
        }
        let offset = self.get_offset(viewport_height);
        offset + viewport_height + BOTTOM_STICKY_LINES >= self.cached_line_count
    }

    pub fn reset(&mut self) {
        self.mode = ScrollMode::FollowLatest;
        self.cached_line_count = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anchored(offset: usize, total: usize) -> ScrollState {
        ScrollState {
            mode: ScrollMode::Anchored { offset },
            cached_line_count: total,
        }
    }

    #[test]
    fn test_follow_mode_tracks_bottom() {
        let mut state = ScrollState::default();
        state.cached_line_count = 100;
        assert_eq!(state.get_offset(20), 80);
        state.cached_line_count = 120;
        assert_eq!(state.get_offset(20), 100);
    }

    #[test]
    fn test_scroll_up_anchors() {
        let mut state = ScrollState::default();
        state.cached_line_count = 100;
        state.scroll_up(5, 20);
        assert_eq!(state.mode, ScrollMode::Anchored { offset: 75 });
    }

    #[test]
    fn test_scroll_down_reenters_follow_at_bottom() {
        let mut state = anchored(70, 100);
        state.scroll_down(5, 20);
        assert_eq!(state.mode, ScrollMode::Anchored { offset: 75 });
        state.scroll_down(10, 20);
        assert!(state.is_following());
    }

    #[test]
    fn test_prepend_adjustment_preserves_visible_content() {
        // 40 lines visible from line 10; prepending 30 lines of older
        // history must land the anchor on the same content at line 40.
        let mut state = anchored(10, 100);
        state.cached_line_count += 30;
        state.adjust_for_prepended(30);
        assert_eq!(state.mode, ScrollMode::Anchored { offset: 40 });
    }

    #[test]
    fn test_prepend_adjustment_is_noop_in_follow_mode() {
        let mut state = ScrollState::default();
        state.cached_line_count = 100;
        state.adjust_for_prepended(30);
        assert!(state.is_following());
    }

    #[test]
    fn test_near_top_requires_anchor() {
        let mut state = ScrollState::default();
        state.cached_line_count = 100;
        // Follow mode is at the bottom, never near the top.
        assert!(!state.near_top(20));
        state.scroll_up(100, 20);
        assert!(state.near_top(20));
    }

    #[test]
    fn test_near_bottom_policy() {
        let state = anchored(78, 100);
        // offset 78 + viewport 20 + slack 3 >= 100
        assert!(state.near_bottom(20));
        let state = anchored(10, 100);
        assert!(!state.near_bottom(20));
    }

    #[test]
    fn test_anchored_offset_clamps_to_content() {
        let state = anchored(500, 100);
        assert_eq!(state.get_offset(20), 80);
    }
}
