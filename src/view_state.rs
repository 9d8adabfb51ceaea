//! Immutable snapshot of the view
//!
//! A [`ViewState`] is built fresh for every decision cycle and never
//! mutated. Render workers can clone it (or share it behind an `Arc`) and
//! query it without synchronization; a newer snapshot simply replaces it.

use std::fmt;
use std::sync::Arc;

use log::debug;

use crate::controller::{ViewController, ViewGeometry};
use crate::geometry::Rect;
use crate::model::{Page, PageRange, PageSequence};
use crate::residency::ResidencyPolicy;
use crate::settings::{AppSettings, BookSettings, PageAlign, Settings};
use crate::tile::PageTreeNode;
use crate::window::PageWindow;
use crate::zoom::Zoom;

/// Colours pages are painted with
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PagePaint {
    /// Page fill, 0xRRGGBB
    pub background: u32,
    /// Text and line art, 0xRRGGBB
    pub foreground: u32,
}

impl PagePaint {
    pub const DAY: PagePaint = PagePaint {
        background: 0xFF_FF_FF,
        foreground: 0x00_00_00,
    };
    pub const NIGHT: PagePaint = PagePaint {
        background: 0x00_00_00,
        foreground: 0xFF_FF_FF,
    };

    #[must_use]
    pub fn for_night_mode(night_mode: bool) -> Self {
        if night_mode { Self::NIGHT } else { Self::DAY }
    }
}

/// Where the view is and which pages matter right now
#[derive(Clone)]
pub struct ViewState {
    /// Application settings in effect when the state was built
    pub app: AppSettings,
    /// Book settings in effect, `None` before a book is opened
    pub book: Option<BookSettings>,
    ctrl: Arc<dyn ViewController>,
    model: Option<Arc<dyn PageSequence>>,

    pub view_rect: Rect,
    pub zoom: f32,
    pub page_align: PageAlign,
    pub night_mode: bool,
    pub paint: PagePaint,

    pub pages: PageWindow,
    policy: ResidencyPolicy,
}

impl ViewState {
    /// Snapshot of the controller's current viewport and zoom
    #[must_use]
    pub fn new(ctrl: Arc<dyn ViewController>, settings: &Settings) -> Self {
        let zoom = ctrl.current_zoom();
        Self::with_zoom(ctrl, zoom, settings)
    }

    /// Snapshot of the controller's viewport at an explicit zoom
    #[must_use]
    pub fn with_zoom(ctrl: Arc<dyn ViewController>, zoom: f32, settings: &Settings) -> Self {
        let night_mode = settings.app.night_mode;
        Self::assemble(
            settings,
            ctrl.clone(),
            ctrl.document(),
            ctrl.current_viewport_rect(),
            Zoom::clamp_factor(zoom),
            settings.page_align(),
            night_mode,
            PagePaint::for_night_mode(night_mode),
            visible_from(ctrl.as_ref()),
        )
    }

    /// Same viewport, zoom and paint as `old`, bound to a replacement
    /// controller (the rendering surface changed, the view did not)
    #[must_use]
    pub fn rebind(old: &ViewState, ctrl: Arc<dyn ViewController>, settings: &Settings) -> Self {
        Self::assemble(
            settings,
            ctrl.clone(),
            ctrl.document(),
            old.view_rect,
            old.zoom,
            old.page_align,
            old.night_mode,
            old.paint,
            visible_from(ctrl.as_ref()),
        )
    }

    /// Same view as `old` with a visible range the host already knows
    #[must_use]
    pub fn with_visible_range(
        old: &ViewState,
        visible: Option<PageRange>,
        settings: &Settings,
    ) -> Self {
        Self::assemble(
            settings,
            old.ctrl.clone(),
            old.model.clone(),
            old.view_rect,
            old.zoom,
            old.page_align,
            old.night_mode,
            old.paint,
            visible,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn assemble(
        settings: &Settings,
        ctrl: Arc<dyn ViewController>,
        model: Option<Arc<dyn PageSequence>>,
        view_rect: Rect,
        zoom: f32,
        page_align: PageAlign,
        night_mode: bool,
        paint: PagePaint,
        visible: Option<PageRange>,
    ) -> Self {
        let geometry = ViewGeometry { view_rect, zoom };
        let pages = PageWindow::compute(
            model.as_ref().map(|m| m.page_count()),
            visible,
            settings.app.pages_in_memory,
            |visible| match model.as_deref() {
                Some(model) => ctrl.compute_current_page(&geometry, model, visible),
                None => 0,
            },
        );

        let state = Self {
            app: settings.app.clone(),
            book: settings.book.clone(),
            ctrl,
            model,
            view_rect,
            zoom,
            page_align,
            night_mode,
            paint,
            pages,
            policy: ResidencyPolicy::new(settings.app.zoom_bands),
        };
        debug!("New view state: {state}");
        state
    }

    #[must_use]
    pub fn controller(&self) -> &Arc<dyn ViewController> {
        &self.ctrl
    }

    #[must_use]
    pub fn document(&self) -> Option<&Arc<dyn PageSequence>> {
        self.model.as_ref()
    }

    #[must_use]
    pub fn policy(&self) -> &ResidencyPolicy {
        &self.policy
    }

    /// Page bounds at this state's zoom, recomputed on every call
    #[must_use]
    pub fn bounds(&self, page: &Page) -> Rect {
        page.bounds(self.zoom)
    }

    #[must_use]
    pub fn is_page_visible(&self, index: usize) -> bool {
        self.pages.is_page_visible(index)
    }

    #[must_use]
    pub fn is_page_cached(&self, index: usize) -> bool {
        self.pages.is_page_cached(index)
    }

    #[must_use]
    pub fn is_page_kept_in_memory(&self, page: &Page) -> bool {
        self.is_page_cached(page.index)
    }

    /// True if the tile's rectangle overlaps the viewport
    #[must_use]
    pub fn is_node_visible(&self, node: &PageTreeNode, page_bounds: &Rect) -> bool {
        self.is_rect_visible(&node.target_rect(page_bounds))
    }

    #[must_use]
    pub fn is_rect_visible(&self, rect: &Rect) -> bool {
        self.view_rect.intersects(rect)
    }

    /// Whether the tile should stay resident under the zoom-banded policy
    #[must_use]
    pub fn should_keep_in_memory(&self, node: &PageTreeNode, page_bounds: &Rect) -> bool {
        self.policy.should_keep_in_memory(node, page_bounds, self)
    }

    /// Visible pages, or every page while the visible range is unknown
    pub fn visible_pages(&self) -> Box<dyn Iterator<Item = &Page> + '_> {
        match (self.model.as_deref(), self.pages.visible()) {
            (Some(model), Some(range)) => model.pages_in_range(range.first, range.last),
            (Some(model), None) => model.pages(),
            (None, _) => Box::new(std::iter::empty()),
        }
    }

    /// Pages in the cache-resident range
    pub fn cached_pages(&self) -> Box<dyn Iterator<Item = &Page> + '_> {
        match (self.model.as_deref(), self.pages.cached()) {
            (Some(model), Some(range)) => model.pages_in_range(range.first, range.last),
            _ => Box::new(std::iter::empty()),
        }
    }

    #[must_use]
    pub fn current_page(&self) -> Option<&Page> {
        let index = self.pages.current()?;
        self.model.as_deref()?.page_at(index)
    }
}

fn visible_from(ctrl: &dyn ViewController) -> Option<PageRange> {
    PageRange::from_bounds(ctrl.first_visible_page_index(), ctrl.last_visible_page_index())
}

impl fmt::Display for ViewState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} zoom: {}", self.pages, self.zoom)
    }
}

impl fmt::Debug for ViewState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewState")
            .field("mode", &self.ctrl.mode())
            .field("view_rect", &self.view_rect)
            .field("zoom", &self.zoom)
            .field("page_align", &self.page_align)
            .field("night_mode", &self.night_mode)
            .field("pages", &self.pages)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::{SinglePageController, VerticalScrollController};
    use crate::geometry::Size;
    use crate::layout;
    use crate::model::DocumentModel;
    use crate::settings::DocumentViewMode;

    fn doc(count: usize) -> Arc<DocumentModel> {
        let sizes = vec![Size::new(100.0, 100.0); count];
        Arc::new(layout::document(
            &sizes,
            DocumentViewMode::VerticalScroll,
            PageAlign::Auto,
            Size::new(100.0, 100.0),
        ))
    }

    fn scroll_ctrl(count: usize, top: f32) -> Arc<dyn ViewController> {
        Arc::new(VerticalScrollController::new(
            Some(doc(count)),
            Rect::new(0.0, top, 100.0, top + 100.0),
            1.0,
        ))
    }

    fn settings(pages_in_memory: usize, night_mode: bool) -> Settings {
        let mut settings = Settings::default();
        settings.app.pages_in_memory = pages_in_memory;
        settings.app.night_mode = night_mode;
        settings
    }

    #[test]
    fn new_state_derives_window_from_controller() {
        let state = ViewState::new(scroll_ctrl(100, 1020.0), &settings(4, false));
        assert_eq!(state.pages.visible(), Some(PageRange::new(10, 11)));
        assert_eq!(state.pages.current(), Some(10));
        assert_eq!(state.pages.cached(), Some(PageRange::new(8, 12)));
        assert_eq!(state.current_page().map(|p| p.index), Some(10));
    }

    #[test]
    fn night_mode_resolved_at_construction() {
        let state = ViewState::new(scroll_ctrl(10, 0.0), &settings(2, true));
        assert!(state.night_mode);
        assert_eq!(state.paint, PagePaint::NIGHT);

        let day = ViewState::new(scroll_ctrl(10, 0.0), &settings(2, false));
        assert_eq!(day.paint, PagePaint::DAY);
    }

    #[test]
    fn scroll_mode_forces_width_alignment() {
        let mut settings = settings(2, false);
        if let Some(book) = settings.book.as_mut() {
            book.page_align = PageAlign::Height;
        }
        let state = ViewState::new(scroll_ctrl(10, 0.0), &settings);
        assert_eq!(state.page_align, PageAlign::Width);
    }

    #[test]
    fn zoom_override_is_used_for_bounds() {
        let state = ViewState::with_zoom(scroll_ctrl(10, 0.0), 2.0, &settings(2, false));
        assert_eq!(state.zoom, 2.0);
        let page = state.document().and_then(|d| d.page_at(1)).cloned().unwrap();
        assert_eq!(state.bounds(&page), Rect::new(0.0, 200.0, 200.0, 400.0));
    }

    #[test]
    fn rebind_keeps_view_but_switches_controller() {
        let old = ViewState::new(scroll_ctrl(10, 0.0), &settings(2, true));
        let single: Arc<dyn ViewController> = Arc::new(SinglePageController::new(
            Some(doc(10)),
            Rect::new(0.0, 0.0, 50.0, 50.0),
            3.0,
            6,
        ));
        let state = ViewState::rebind(&old, single, &settings(2, false));
        assert_eq!(state.view_rect, old.view_rect);
        assert_eq!(state.zoom, old.zoom);
        assert!(state.night_mode);
        assert_eq!(state.controller().mode(), DocumentViewMode::SinglePage);
        assert_eq!(state.pages.current(), Some(6));
        assert_eq!(state.pages.visible(), Some(PageRange::single(6)));
    }

    #[test]
    fn explicit_visible_range_recomputes_window() {
        let old = ViewState::new(scroll_ctrl(100, 0.0), &settings(4, false));
        let state =
            ViewState::with_visible_range(&old, Some(PageRange::new(40, 41)), &settings(4, false));
        assert_eq!(state.pages.visible(), Some(PageRange::new(40, 41)));
        assert_eq!(state.pages.current(), Some(40));
        assert_eq!(state.pages.cached(), Some(PageRange::new(38, 42)));
    }

    #[test]
    fn stale_visible_range_past_document_is_dropped() {
        let old = ViewState::new(scroll_ctrl(10, 320.0), &settings(4, false));
        let state =
            ViewState::with_visible_range(&old, Some(PageRange::new(50, 60)), &settings(4, false));
        assert_eq!(state.pages.visible(), None);
        assert_eq!(state.pages.current(), Some(3));
        assert!(!state.is_page_visible(55));
        assert_eq!(state.pages.cached(), Some(PageRange::new(1, 5)));
        assert!(state.current_page().is_some());
    }

    #[test]
    fn no_document_uses_passthrough_window() {
        let ctrl: Arc<dyn ViewController> = Arc::new(VerticalScrollController::new(
            None,
            Rect::new(0.0, 0.0, 100.0, 100.0),
            1.0,
        ));
        let old = ViewState::new(ctrl, &settings(4, false));
        assert_eq!(old.pages.current(), None);
        assert_eq!(old.visible_pages().count(), 0);
        assert!(old.current_page().is_none());

        let state =
            ViewState::with_visible_range(&old, Some(PageRange::new(3, 5)), &settings(4, false));
        assert_eq!(state.pages.current(), Some(3));
        assert_eq!(state.pages.cached(), Some(PageRange::new(3, 5)));
    }

    #[test]
    fn unknown_visible_range_lists_every_page() {
        let state = ViewState::new(scroll_ctrl(6, 10_000.0), &settings(2, false));
        assert_eq!(state.pages.visible(), None);
        assert_eq!(state.visible_pages().count(), 6);
        assert_eq!(state.pages.current(), Some(5));
        assert_eq!(state.cached_pages().map(|p| p.index).collect::<Vec<_>>(), vec![4, 5]);
    }

    #[test]
    fn display_matches_window_and_zoom() {
        let state = ViewState::new(scroll_ctrl(100, 1020.0), &settings(4, false));
        assert_eq!(
            state.to_string(),
            "visible: [10, 10, 11] cached: [8, 12] zoom: 1"
        );
    }
}
