//! View navigation state
//!
//! Owns the mutable inputs of the engine (document, view size, scroll
//! position, zoom, mode) and turns view-changing commands into effects.
//! Decisions are made on immutable [`ViewState`] snapshots taken after
//! each command.

use std::sync::Arc;

use log::warn;

use crate::controller::{
    HorizontalScrollController, SinglePageController, VerticalScrollController, ViewController,
};
use crate::geometry::{Rect, Size};
use crate::layout;
use crate::model::{DocumentModel, PageSequence};
use crate::settings::{DocumentViewMode, Settings};
use crate::view_state::ViewState;
use crate::zoom::Zoom;

/// Current navigation state for a document view
#[derive(Clone, Debug)]
pub struct Navigator {
    settings: Settings,
    mode: DocumentViewMode,
    /// Natural page sizes, `None` while no document is loaded
    page_sizes: Option<Vec<Size>>,
    document: Option<Arc<DocumentModel>>,
    view_rect: Rect,
    zoom: Zoom,
    /// Page shown in single page mode
    single_page: usize,
}

impl Navigator {
    /// Navigator with no document and an empty view
    #[must_use]
    pub fn new(settings: Settings) -> Self {
        let mode = settings.view_mode();
        let zoom = Zoom::new(settings.book.as_ref().map_or(1.0, |b| b.zoom));
        Self {
            settings,
            mode,
            page_sizes: None,
            document: None,
            view_rect: Rect::default(),
            zoom,
            single_page: 0,
        }
    }

    /// Apply a command and return resulting effects
    #[must_use]
    pub fn apply(&mut self, cmd: Command) -> Vec<Effect> {
        match cmd {
            Command::SetDocument(sizes) => {
                self.page_sizes = sizes;
                self.single_page = 0;
                self.view_rect = Rect::from_origin_size(0.0, 0.0, self.view_rect.size());
                self.relayout();
                vec![
                    Effect::Relayout,
                    Effect::InvalidateBounds,
                    Effect::RecomputeWindow,
                ]
            }

            Command::SetViewSize(size) => {
                if self.view_rect.size() == size {
                    return vec![];
                }
                self.view_rect = Rect::from_origin_size(self.view_rect.left, self.view_rect.top, size);
                self.relayout();
                self.clamp_scroll();
                vec![
                    Effect::Relayout,
                    Effect::InvalidateBounds,
                    Effect::RecomputeWindow,
                ]
            }

            Command::ScrollBy { dx, dy } => {
                if !dx.is_finite() || !dy.is_finite() {
                    warn!("Ignoring non-finite scroll delta ({dx}, {dy})");
                    return vec![];
                }
                let before = self.view_rect;
                self.view_rect = self.view_rect.offset(dx, dy);
                self.clamp_scroll();
                if self.view_rect != before {
                    vec![Effect::RecomputeWindow]
                } else {
                    vec![]
                }
            }

            Command::SetZoom(factor) => {
                let old = self.zoom.factor();
                if self.zoom.set(factor) {
                    self.rescale(old);
                    vec![Effect::InvalidateBounds, Effect::RecomputeWindow]
                } else {
                    vec![]
                }
            }

            Command::ZoomIn => {
                let old = self.zoom.factor();
                self.zoom.step_in();
                self.zoom_effects(old)
            }

            Command::ZoomOut => {
                let old = self.zoom.factor();
                self.zoom.step_out();
                self.zoom_effects(old)
            }

            Command::GoToPage(page) => {
                let Some(doc) = self.document.clone() else {
                    return vec![];
                };
                if doc.page_count() == 0 {
                    return vec![];
                }
                let page = page.min(doc.page_count() - 1);
                let before = (self.view_rect, self.single_page);
                match self.mode {
                    DocumentViewMode::SinglePage => {
                        self.single_page = page;
                        self.view_rect = Rect::from_origin_size(0.0, 0.0, self.view_rect.size());
                    }
                    DocumentViewMode::VerticalScroll | DocumentViewMode::HorizontalScroll => {
                        if let Some(target) = doc.page_at(page) {
                            let bounds = target.bounds(self.zoom.factor());
                            let (dx, dy) = match self.mode {
                                DocumentViewMode::HorizontalScroll => (bounds.left - self.view_rect.left, 0.0),
                                _ => (0.0, bounds.top - self.view_rect.top),
                            };
                            self.view_rect = self.view_rect.offset(dx, dy);
                        }
                    }
                }
                self.clamp_scroll();
                if (self.view_rect, self.single_page) != before {
                    vec![Effect::RecomputeWindow]
                } else {
                    vec![]
                }
            }

            Command::SetViewMode(mode) => {
                if self.mode == mode {
                    return vec![];
                }
                self.mode = mode;
                if let Some(book) = self.settings.book.as_mut() {
                    book.view_mode = mode;
                }
                self.view_rect = Rect::from_origin_size(0.0, 0.0, self.view_rect.size());
                self.relayout();
                vec![
                    Effect::Relayout,
                    Effect::InvalidateBounds,
                    Effect::RecomputeWindow,
                ]
            }

            Command::SetNightMode(night_mode) => {
                if self.settings.app.night_mode == night_mode {
                    return vec![];
                }
                self.settings.app.night_mode = night_mode;
                vec![Effect::Repaint]
            }

            Command::SetPagesInMemory(pages) => {
                if self.settings.app.pages_in_memory == pages {
                    return vec![];
                }
                self.settings.app.pages_in_memory = pages;
                vec![Effect::RecomputeWindow]
            }
        }
    }

    fn zoom_effects(&mut self, old: f32) -> Vec<Effect> {
        if (self.zoom.factor() - old).abs() > f32::EPSILON {
            self.rescale(old);
            vec![Effect::InvalidateBounds, Effect::RecomputeWindow]
        } else {
            vec![]
        }
    }

    /// Keep the viewport centre on the same document point across a zoom change
    fn rescale(&mut self, old: f32) {
        let ratio = self.zoom.factor() / old;
        let size = self.view_rect.size();
        let center_x = self.view_rect.center_x() * ratio;
        let center_y = self.view_rect.center_y() * ratio;
        self.view_rect = Rect::from_origin_size(
            center_x - size.width * 0.5,
            center_y - size.height * 0.5,
            size,
        );
        self.clamp_scroll();
    }

    fn relayout(&mut self) {
        self.document = self.page_sizes.as_ref().map(|sizes| {
            Arc::new(layout::document(
                sizes,
                self.mode,
                self.settings.page_align(),
                self.view_rect.size(),
            ))
        });
        if let Some(doc) = &self.document {
            self.single_page = self.single_page.min(doc.page_count().saturating_sub(1));
        }
    }

    /// Scrollable area at the current zoom
    fn extent(&self) -> Rect {
        let zoom = self.zoom.factor();
        match (&self.document, self.mode) {
            (Some(doc), DocumentViewMode::SinglePage) => doc
                .page_at(self.single_page)
                .map(|p| p.bounds(zoom))
                .unwrap_or_default(),
            (Some(doc), _) => doc.extent(zoom),
            (None, _) => Rect::default(),
        }
    }

    fn clamp_scroll(&mut self) {
        let extent = self.extent();
        let size = self.view_rect.size();
        let max_left = (extent.right - size.width).max(0.0);
        let max_top = (extent.bottom - size.height).max(0.0);
        let left = self.view_rect.left.clamp(0.0, max_left);
        let top = self.view_rect.top.clamp(0.0, max_top);
        self.view_rect = Rect::from_origin_size(left, top, size);
    }

    /// Controller for the current mode and viewport
    #[must_use]
    pub fn controller(&self) -> Arc<dyn ViewController> {
        let document = self.document.clone();
        let zoom = self.zoom.factor();
        match self.mode {
            DocumentViewMode::VerticalScroll => {
                Arc::new(VerticalScrollController::new(document, self.view_rect, zoom))
            }
            DocumentViewMode::HorizontalScroll => {
                Arc::new(HorizontalScrollController::new(document, self.view_rect, zoom))
            }
            DocumentViewMode::SinglePage => Arc::new(SinglePageController::new(
                document,
                self.view_rect,
                zoom,
                self.single_page,
            )),
        }
    }

    /// Fresh immutable view state
    #[must_use]
    pub fn snapshot(&self) -> ViewState {
        ViewState::new(self.controller(), &self.settings)
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[must_use]
    pub fn mode(&self) -> DocumentViewMode {
        self.mode
    }

    #[must_use]
    pub fn document(&self) -> Option<&Arc<DocumentModel>> {
        self.document.as_ref()
    }

    #[must_use]
    pub fn view_rect(&self) -> Rect {
        self.view_rect
    }

    #[must_use]
    pub fn zoom(&self) -> f32 {
        self.zoom.factor()
    }
}

/// Commands that change the view
#[derive(Clone, Debug)]
pub enum Command {
    /// Load natural page sizes of a document, or unload with `None`
    SetDocument(Option<Vec<Size>>),
    /// Resize the drawing surface
    SetViewSize(Size),
    /// Scroll by a delta in zoomed document units
    ScrollBy { dx: f32, dy: f32 },
    /// Set the zoom factor
    SetZoom(f32),
    /// Zoom in by one step
    ZoomIn,
    /// Zoom out by one step
    ZoomOut,
    /// Bring a page into view
    GoToPage(usize),
    /// Switch view mode
    SetViewMode(DocumentViewMode),
    /// Toggle day/night rendering
    SetNightMode(bool),
    /// Change the pages-in-memory budget
    SetPagesInMemory(usize),
}

/// Effects produced by state changes
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    /// Page bounds were recomputed, tile trees must be rebuilt
    Relayout,
    /// Cached page bounds are stale
    InvalidateBounds,
    /// Take a new snapshot and re-evaluate residency
    RecomputeWindow,
    /// Redraw with the current paint
    Repaint,
}
