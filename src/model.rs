//! Page sequence model
//!
//! The engine only ever refers to pages by index; [`PageSequence`] is the
//! narrow contract through which it reads page geometry.

use std::fmt;

use crate::geometry::{Rect, Size};

/// A single page of a laid-out document
#[derive(Clone, Debug, PartialEq)]
pub struct Page {
    /// Stable 0-based index
    pub index: usize,
    /// Natural page size as reported by the decoder
    pub size: Size,
    /// Laid-out bounds at zoom 1.0
    pub bounds: Rect,
}

impl Page {
    #[must_use]
    pub fn new(index: usize, size: Size, bounds: Rect) -> Self {
        Self {
            index,
            size,
            bounds,
        }
    }

    /// Page bounds at the given zoom
    #[must_use]
    pub fn bounds(&self, zoom: f32) -> Rect {
        self.bounds.scale(zoom)
    }
}

/// Inclusive range of page indices
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRange {
    pub first: usize,
    pub last: usize,
}

impl PageRange {
    /// Range covering `first..=last`, swapping the ends if given reversed
    #[must_use]
    pub fn new(first: usize, last: usize) -> Self {
        if first <= last {
            Self { first, last }
        } else {
            Self {
                first: last,
                last: first,
            }
        }
    }

    #[must_use]
    pub fn single(index: usize) -> Self {
        Self {
            first: index,
            last: index,
        }
    }

    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        self.first <= index && index <= self.last
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.last - self.first + 1
    }

    /// Always false, a range holds at least one page
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Part of the range at or below `last_page`, `None` if it starts past it
    #[must_use]
    pub fn clamp_to(&self, last_page: usize) -> Option<Self> {
        (self.first <= last_page).then(|| Self {
            first: self.first,
            last: self.last.min(last_page),
        })
    }

    /// Range from optional endpoints; both must be known
    #[must_use]
    pub fn from_bounds(first: Option<usize>, last: Option<usize>) -> Option<Self> {
        match (first, last) {
            (Some(first), Some(last)) => Some(Self::new(first, last)),
            _ => None,
        }
    }
}

impl fmt::Display for PageRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.first, self.last)
    }
}

/// Ordered collection of pages
pub trait PageSequence: Send + Sync {
    fn page_count(&self) -> usize;

    fn page_at(&self, index: usize) -> Option<&Page>;

    /// Pages in `first..=last`, truncated to the document.
    ///
    /// The iterator is finite and a fresh one can be requested at any time.
    fn pages_in_range(&self, first: usize, last: usize) -> Box<dyn Iterator<Item = &Page> + '_>;

    /// Every page in order
    fn pages(&self) -> Box<dyn Iterator<Item = &Page> + '_> {
        match self.page_count() {
            0 => Box::new(std::iter::empty()),
            count => self.pages_in_range(0, count - 1),
        }
    }
}

/// Laid-out document held in memory
#[derive(Clone, Debug, Default)]
pub struct DocumentModel {
    pages: Vec<Page>,
}

impl DocumentModel {
    /// Build a model from laid-out pages.
    ///
    /// Pages are re-indexed by position so indices stay contiguous.
    #[must_use]
    pub fn new(pages: Vec<Page>) -> Self {
        let pages = pages
            .into_iter()
            .enumerate()
            .map(|(index, page)| Page { index, ..page })
            .collect();
        Self { pages }
    }

    /// Bounding box of every page at `zoom`
    #[must_use]
    pub fn extent(&self, zoom: f32) -> Rect {
        self.pages
            .iter()
            .map(|p| p.bounds(zoom))
            .reduce(|acc, r| {
                Rect::new(
                    acc.left.min(r.left),
                    acc.top.min(r.top),
                    acc.right.max(r.right),
                    acc.bottom.max(r.bottom),
                )
            })
            .unwrap_or_default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Natural sizes of every page, used to lay the document out again
    #[must_use]
    pub fn page_sizes(&self) -> Vec<Size> {
        self.pages.iter().map(|p| p.size).collect()
    }
}

impl PageSequence for DocumentModel {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_at(&self, index: usize) -> Option<&Page> {
        self.pages.get(index)
    }

    fn pages_in_range(&self, first: usize, last: usize) -> Box<dyn Iterator<Item = &Page> + '_> {
        if first >= self.pages.len() || first > last {
            return Box::new(std::iter::empty());
        }
        let end = last.min(self.pages.len() - 1);
        Box::new(self.pages[first..=end].iter())
    }
}
