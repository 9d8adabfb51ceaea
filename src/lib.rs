//! Viewport and cache-window engine for paginated document viewers
//!
//! Given where the view is, how far it is zoomed and how the document's
//! pages are laid out, the engine answers which page is current, which
//! pages are on screen, which pages to keep resident, and whether an
//! individual render tile should stay in memory.

pub mod bounds_cache;
pub mod controller;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod model;
pub mod navigator;
pub mod residency;
pub mod settings;
pub mod tile;
pub mod view_state;
pub mod window;
pub mod zoom;

pub use bounds_cache::{BoundsCache, BoundsKey};
pub use controller::{
    HorizontalScrollController, SinglePageController, VerticalScrollController, ViewController,
    ViewGeometry,
};
pub use error::SettingsError;
pub use geometry::{Rect, Size};
pub use model::{DocumentModel, Page, PageRange, PageSequence};
pub use navigator::{Command, Effect, Navigator};
pub use residency::{ResidencyPlan, ResidencyPolicy};
pub use settings::{AppSettings, BookSettings, DocumentViewMode, PageAlign, Settings};
pub use tile::{NodeId, PageTree, PageTreeNode};
pub use view_state::{PagePaint, ViewState};
pub use window::PageWindow;
pub use zoom::{Zoom, ZoomBand, ZoomBands};
