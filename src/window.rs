//! Page window: current, visible and cache-resident page ranges

use std::fmt;

use log::debug;

use crate::model::PageRange;

/// Which pages are current, on screen and kept in memory.
///
/// `None` stands for "not known yet": the visible range before the first
/// layout, or everything while no document is loaded and the host has not
/// reported a visible range either.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageWindow {
    current: Option<usize>,
    visible: Option<PageRange>,
    cached: Option<PageRange>,
}

impl PageWindow {
    /// Derive a window.
    ///
    /// `page_count` is `None` while no document is available; the window then
    /// passes the visible range through unchanged. Otherwise `current_page`
    /// picks the current page for the visible range (or for the whole
    /// document when that range is unknown) and the cached range spans
    /// `ceil(pages_in_memory / 2)` pages on each side of it, clamped to the
    /// document. A visible range reaching past the document is cut to it, or
    /// dropped when it lies entirely outside; the current page always falls
    /// inside what is left.
    pub fn compute(
        page_count: Option<usize>,
        visible: Option<PageRange>,
        pages_in_memory: usize,
        current_page: impl FnOnce(Option<PageRange>) -> usize,
    ) -> Self {
        let window = match page_count {
            Some(count) if count > 0 => {
                let last_page = count - 1;
                let visible = visible.and_then(|r| r.clamp_to(last_page));
                let mut current = current_page(visible).min(last_page);
                if let Some(r) = visible {
                    current = current.clamp(r.first, r.last);
                }
                let half = pages_in_memory.div_ceil(2);
                let cached = PageRange {
                    first: current.saturating_sub(half),
                    last: current.saturating_add(half).min(last_page),
                };
                Self {
                    current: Some(current),
                    visible,
                    cached: Some(cached),
                }
            }
            _ => Self::passthrough(visible),
        };
        debug!("Computed {window}");
        window
    }

    /// Window used before a document is available
    #[must_use]
    pub fn passthrough(visible: Option<PageRange>) -> Self {
        Self {
            current: visible.map(|r| r.first),
            visible,
            cached: visible,
        }
    }

    #[must_use]
    pub fn current(&self) -> Option<usize> {
        self.current
    }

    #[must_use]
    pub fn visible(&self) -> Option<PageRange> {
        self.visible
    }

    #[must_use]
    pub fn cached(&self) -> Option<PageRange> {
        self.cached
    }

    #[must_use]
    pub fn first_visible(&self) -> Option<usize> {
        self.visible.map(|r| r.first)
    }

    #[must_use]
    pub fn last_visible(&self) -> Option<usize> {
        self.visible.map(|r| r.last)
    }

    #[must_use]
    pub fn first_cached(&self) -> Option<usize> {
        self.cached.map(|r| r.first)
    }

    #[must_use]
    pub fn last_cached(&self) -> Option<usize> {
        self.cached.map(|r| r.last)
    }

    /// True if `index` is inside the visible range; false while it is unknown
    #[must_use]
    pub fn is_page_visible(&self, index: usize) -> bool {
        self.visible.is_some_and(|r| r.contains(index))
    }

    /// True if `index` is inside the cache-resident range
    #[must_use]
    pub fn is_page_cached(&self, index: usize) -> bool {
        self.cached.is_some_and(|r| r.contains(index))
    }
}

fn fmt_index(index: Option<usize>) -> String {
    index.map_or_else(|| "-".to_string(), |i| i.to_string())
}

impl fmt::Display for PageWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "visible: [{}, {}, {}] cached: [{}, {}]",
            fmt_index(self.first_visible()),
            fmt_index(self.current),
            fmt_index(self.last_visible()),
            fmt_index(self.first_cached()),
            fmt_index(self.last_cached()),
        )
    }
}
