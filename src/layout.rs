//! Page layout at zoom 1.0
//!
//! Turns natural page sizes into laid-out bounds for a view mode. Bounds
//! are computed once per document/view-size change; zooming only scales
//! them.

use crate::geometry::{Rect, Size};
use crate::model::{DocumentModel, Page};
use crate::settings::{DocumentViewMode, PageAlign};

/// Lay out `sizes` for `mode` inside a view of size `view`
#[must_use]
pub fn lay_out(sizes: &[Size], mode: DocumentViewMode, align: PageAlign, view: Size) -> Vec<Page> {
    match mode {
        DocumentViewMode::VerticalScroll => {
            let mut top = 0.0;
            sizes
                .iter()
                .enumerate()
                .map(|(index, &size)| {
                    let scaled = fit(size, PageAlign::Width, view);
                    let bounds = Rect::from_origin_size(0.0, top, scaled);
                    top = bounds.bottom;
                    Page::new(index, size, bounds)
                })
                .collect()
        }
        DocumentViewMode::HorizontalScroll => {
            let mut left = 0.0;
            sizes
                .iter()
                .enumerate()
                .map(|(index, &size)| {
                    let scaled = fit(size, PageAlign::Height, view);
                    let bounds = Rect::from_origin_size(left, 0.0, scaled);
                    left = bounds.right;
                    Page::new(index, size, bounds)
                })
                .collect()
        }
        DocumentViewMode::SinglePage => sizes
            .iter()
            .enumerate()
            .map(|(index, &size)| {
                let bounds = Rect::from_origin_size(0.0, 0.0, fit(size, align, view));
                Page::new(index, size, bounds)
            })
            .collect(),
    }
}

/// Convenience wrapper producing a [`DocumentModel`]
#[must_use]
pub fn document(sizes: &[Size], mode: DocumentViewMode, align: PageAlign, view: Size) -> DocumentModel {
    DocumentModel::new(lay_out(sizes, mode, align, view))
}

/// Scale `page` to fit `view` according to `align`.
///
/// Degenerate page or view sizes leave the page at its natural size.
fn fit(page: Size, align: PageAlign, view: Size) -> Size {
    if page.is_empty() || view.is_empty() {
        return page;
    }
    let by_width = view.width / page.width;
    let by_height = view.height / page.height;
    let factor = match align {
        PageAlign::Width => by_width,
        PageAlign::Height => by_height,
        PageAlign::Auto => by_width.min(by_height),
    };
    Size::new(page.width * factor, page.height * factor)
}
