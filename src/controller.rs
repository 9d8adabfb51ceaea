//! View controllers
//!
//! A controller knows where the viewport is and how pages are arranged for
//! one view mode. The engine talks to it only through [`ViewController`];
//! each view mode is its own implementation.

use std::sync::Arc;

use crate::geometry::Rect;
use crate::model::{DocumentModel, Page, PageRange, PageSequence};
use crate::settings::DocumentViewMode;

/// Viewport rectangle and zoom a decision is being made for.
///
/// Usually the controller's own values, but a view state built with an
/// explicit zoom passes its override here.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewGeometry {
    pub view_rect: Rect,
    pub zoom: f32,
}

/// Capability contract the engine needs from the host's view controller
pub trait ViewController: Send + Sync {
    fn mode(&self) -> DocumentViewMode;

    /// Page sequence shown by this controller, `None` while loading
    fn document(&self) -> Option<Arc<dyn PageSequence>>;

    fn current_viewport_rect(&self) -> Rect;

    fn current_zoom(&self) -> f32;

    fn first_visible_page_index(&self) -> Option<usize>;

    fn last_visible_page_index(&self) -> Option<usize>;

    /// Best current page for `visible`, or for the whole document when the
    /// visible range is unknown
    fn compute_current_page(
        &self,
        geometry: &ViewGeometry,
        pages: &dyn PageSequence,
        visible: Option<PageRange>,
    ) -> usize;
}

/// Pages whose bounds at `zoom` overlap `view_rect`
fn visible_range(doc: &DocumentModel, view_rect: &Rect, zoom: f32) -> Option<PageRange> {
    let mut visible = doc
        .pages()
        .filter(|p| p.bounds(zoom).intersects(view_rect))
        .map(|p| p.index);
    let first = visible.next()?;
    let last = visible.last().unwrap_or(first);
    Some(PageRange::new(first, last))
}

/// Index of the page whose centre on `axis` is nearest the viewport centre.
/// Ties go to the lower index.
fn closest_page<'a>(
    pages: impl Iterator<Item = &'a Page>,
    geometry: &ViewGeometry,
    axis: Axis,
) -> usize {
    let view_center = axis.center(&geometry.view_rect);
    let mut best = 0;
    let mut best_distance = f32::INFINITY;
    for page in pages {
        let distance = (axis.center(&page.bounds(geometry.zoom)) - view_center).abs();
        if distance < best_distance {
            best_distance = distance;
            best = page.index;
        }
    }
    best
}

fn candidate_pages<'a>(
    pages: &'a dyn PageSequence,
    visible: Option<PageRange>,
) -> Box<dyn Iterator<Item = &'a Page> + 'a> {
    match visible {
        Some(range) => pages.pages_in_range(range.first, range.last),
        None => pages.pages(),
    }
}

#[derive(Clone, Copy, Debug)]
enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    fn center(self, rect: &Rect) -> f32 {
        match self {
            Axis::Horizontal => rect.center_x(),
            Axis::Vertical => rect.center_y(),
        }
    }
}

/// Continuous vertical scrolling
#[derive(Clone, Debug)]
pub struct VerticalScrollController {
    document: Option<Arc<DocumentModel>>,
    view_rect: Rect,
    zoom: f32,
    visible: Option<PageRange>,
}

impl VerticalScrollController {
    #[must_use]
    pub fn new(document: Option<Arc<DocumentModel>>, view_rect: Rect, zoom: f32) -> Self {
        let visible = document
            .as_deref()
            .and_then(|doc| visible_range(doc, &view_rect, zoom));
        Self {
            document,
            view_rect,
            zoom,
            visible,
        }
    }
}

impl ViewController for VerticalScrollController {
    fn mode(&self) -> DocumentViewMode {
        DocumentViewMode::VerticalScroll
    }

    fn document(&self) -> Option<Arc<dyn PageSequence>> {
        self.document
            .clone()
            .map(|doc| doc as Arc<dyn PageSequence>)
    }

    fn current_viewport_rect(&self) -> Rect {
        self.view_rect
    }

    fn current_zoom(&self) -> f32 {
        self.zoom
    }

    fn first_visible_page_index(&self) -> Option<usize> {
        self.visible.map(|r| r.first)
    }

    fn last_visible_page_index(&self) -> Option<usize> {
        self.visible.map(|r| r.last)
    }

    fn compute_current_page(
        &self,
        geometry: &ViewGeometry,
        pages: &dyn PageSequence,
        visible: Option<PageRange>,
    ) -> usize {
        closest_page(candidate_pages(pages, visible), geometry, Axis::Vertical)
    }
}

/// Continuous horizontal scrolling
#[derive(Clone, Debug)]
pub struct HorizontalScrollController {
    document: Option<Arc<DocumentModel>>,
    view_rect: Rect,
    zoom: f32,
    visible: Option<PageRange>,
}

impl HorizontalScrollController {
    #[must_use]
    pub fn new(document: Option<Arc<DocumentModel>>, view_rect: Rect, zoom: f32) -> Self {
        let visible = document
            .as_deref()
            .and_then(|doc| visible_range(doc, &view_rect, zoom));
        Self {
            document,
            view_rect,
            zoom,
            visible,
        }
    }
}

impl ViewController for HorizontalScrollController {
    fn mode(&self) -> DocumentViewMode {
        DocumentViewMode::HorizontalScroll
    }

    fn document(&self) -> Option<Arc<dyn PageSequence>> {
        self.document
            .clone()
            .map(|doc| doc as Arc<dyn PageSequence>)
    }

    fn current_viewport_rect(&self) -> Rect {
        self.view_rect
    }

    fn current_zoom(&self) -> f32 {
        self.zoom
    }

    fn first_visible_page_index(&self) -> Option<usize> {
        self.visible.map(|r| r.first)
    }

    fn last_visible_page_index(&self) -> Option<usize> {
        self.visible.map(|r| r.last)
    }

    fn compute_current_page(
        &self,
        geometry: &ViewGeometry,
        pages: &dyn PageSequence,
        visible: Option<PageRange>,
    ) -> usize {
        closest_page(candidate_pages(pages, visible), geometry, Axis::Horizontal)
    }
}

/// One page at a time; every page is laid out at the origin
#[derive(Clone, Debug)]
pub struct SinglePageController {
    document: Option<Arc<DocumentModel>>,
    view_rect: Rect,
    zoom: f32,
    page: usize,
}

impl SinglePageController {
    #[must_use]
    pub fn new(document: Option<Arc<DocumentModel>>, view_rect: Rect, zoom: f32, page: usize) -> Self {
        let page = match document.as_deref() {
            Some(doc) => page.min(doc.page_count().saturating_sub(1)),
            None => page,
        };
        Self {
            document,
            view_rect,
            zoom,
            page,
        }
    }

    fn shown_page(&self) -> Option<usize> {
        self.document
            .as_deref()
            .filter(|doc| doc.page_count() > 0)
            .map(|_| self.page)
    }
}

impl ViewController for SinglePageController {
    fn mode(&self) -> DocumentViewMode {
        DocumentViewMode::SinglePage
    }

    fn document(&self) -> Option<Arc<dyn PageSequence>> {
        self.document
            .clone()
            .map(|doc| doc as Arc<dyn PageSequence>)
    }

    fn current_viewport_rect(&self) -> Rect {
        self.view_rect
    }

    fn current_zoom(&self) -> f32 {
        self.zoom
    }

    fn first_visible_page_index(&self) -> Option<usize> {
        self.shown_page()
    }

    fn last_visible_page_index(&self) -> Option<usize> {
        self.shown_page()
    }

    fn compute_current_page(
        &self,
        _geometry: &ViewGeometry,
        pages: &dyn PageSequence,
        _visible: Option<PageRange>,
    ) -> usize {
        self.page.min(pages.page_count().saturating_sub(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Size;
    use crate::layout;
    use crate::settings::PageAlign;

    const VIEW: Size = Size::new(100.0, 100.0);

    fn doc(mode: DocumentViewMode, count: usize) -> Arc<DocumentModel> {
        let sizes = vec![Size::new(100.0, 100.0); count];
        Arc::new(layout::document(&sizes, mode, PageAlign::Auto, VIEW))
    }

    #[test]
    fn vertical_visible_range_follows_scroll() {
        let doc = doc(DocumentViewMode::VerticalScroll, 10);
        let ctrl = VerticalScrollController::new(Some(doc), Rect::new(0.0, 150.0, 100.0, 250.0), 1.0);
        assert_eq!(ctrl.first_visible_page_index(), Some(1));
        assert_eq!(ctrl.last_visible_page_index(), Some(2));
    }

    #[test]
    fn vertical_page_edge_is_not_visible() {
        let doc = doc(DocumentViewMode::VerticalScroll, 10);
        let ctrl = VerticalScrollController::new(Some(doc), Rect::new(0.0, 100.0, 100.0, 200.0), 1.0);
        assert_eq!(ctrl.first_visible_page_index(), Some(1));
        assert_eq!(ctrl.last_visible_page_index(), Some(1));
    }

    #[test]
    fn vertical_current_page_is_closest_to_center() {
        let doc = doc(DocumentViewMode::VerticalScroll, 10);
        let rect = Rect::new(0.0, 170.0, 100.0, 270.0);
        let ctrl = VerticalScrollController::new(Some(doc.clone()), rect, 1.0);
        let geometry = ViewGeometry {
            view_rect: rect,
            zoom: 1.0,
        };
        let visible = PageRange::from_bounds(
            ctrl.first_visible_page_index(),
            ctrl.last_visible_page_index(),
        );
        assert_eq!(ctrl.compute_current_page(&geometry, &*doc, visible), 2);
    }

    #[test]
    fn current_page_with_unknown_range_scans_all() {
        let doc = doc(DocumentViewMode::VerticalScroll, 10);
        let rect = Rect::new(0.0, 5000.0, 100.0, 5100.0);
        let ctrl = VerticalScrollController::new(Some(doc.clone()), rect, 1.0);
        assert_eq!(ctrl.first_visible_page_index(), None);
        let geometry = ViewGeometry {
            view_rect: rect,
            zoom: 1.0,
        };
        assert_eq!(ctrl.compute_current_page(&geometry, &*doc, None), 9);
    }

    #[test]
    fn zoom_scales_visible_range() {
        let doc = doc(DocumentViewMode::VerticalScroll, 10);
        let ctrl = VerticalScrollController::new(Some(doc), Rect::new(0.0, 450.0, 100.0, 550.0), 2.0);
        assert_eq!(ctrl.first_visible_page_index(), Some(2));
        assert_eq!(ctrl.last_visible_page_index(), Some(2));
    }

    #[test]
    fn horizontal_uses_x_axis() {
        let doc = doc(DocumentViewMode::HorizontalScroll, 5);
        let rect = Rect::new(260.0, 0.0, 360.0, 100.0);
        let ctrl = HorizontalScrollController::new(Some(doc.clone()), rect, 1.0);
        assert_eq!(ctrl.first_visible_page_index(), Some(2));
        assert_eq!(ctrl.last_visible_page_index(), Some(3));
        let geometry = ViewGeometry {
            view_rect: rect,
            zoom: 1.0,
        };
        let visible = PageRange::from_bounds(
            ctrl.first_visible_page_index(),
            ctrl.last_visible_page_index(),
        );
        assert_eq!(ctrl.compute_current_page(&geometry, &*doc, visible), 3);
    }

    #[test]
    fn single_page_shows_one_page() {
        let doc = doc(DocumentViewMode::SinglePage, 4);
        let ctrl = SinglePageController::new(Some(doc.clone()), Rect::new(0.0, 0.0, 100.0, 100.0), 1.0, 9);
        assert_eq!(ctrl.first_visible_page_index(), Some(3));
        assert_eq!(ctrl.last_visible_page_index(), Some(3));
        let geometry = ViewGeometry {
            view_rect: ctrl.current_viewport_rect(),
            zoom: 1.0,
        };
        assert_eq!(ctrl.compute_current_page(&geometry, &*doc, None), 3);
    }

    #[test]
    fn no_document_has_no_visible_pages() {
        let ctrl = VerticalScrollController::new(None, Rect::new(0.0, 0.0, 100.0, 100.0), 1.0);
        assert!(ctrl.document().is_none());
        assert_eq!(ctrl.first_visible_page_index(), None);

        let single = SinglePageController::new(None, Rect::new(0.0, 0.0, 100.0, 100.0), 1.0, 2);
        assert_eq!(single.first_visible_page_index(), None);
    }
}
