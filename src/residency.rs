//! Tile residency policy
//!
//! Decides, per tile, whether it stays in memory. At low zoom whole pages
//! are cheap, so page residency decides. As zoom grows the number of tiles
//! per page explodes and residency has to follow on-screen visibility.

use log::{debug, trace};

use crate::bounds_cache::BoundsCache;
use crate::geometry::Rect;
use crate::model::Page;
use crate::tile::{NodeId, PageTree, PageTreeNode};
use crate::view_state::ViewState;
use crate::zoom::{ZoomBand, ZoomBands};

/// Zoom-banded keep/discard rules
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ResidencyPolicy {
    bands: ZoomBands,
}

impl ResidencyPolicy {
    #[must_use]
    pub fn new(bands: ZoomBands) -> Self {
        Self { bands }
    }

    #[must_use]
    pub fn bands(&self) -> ZoomBands {
        self.bands
    }

    /// Whether `node` should stay resident.
    ///
    /// `page_bounds` are the bounds of the node's page at `state.zoom`.
    #[must_use]
    pub fn should_keep_in_memory(
        &self,
        node: &PageTreeNode,
        page_bounds: &Rect,
        state: &ViewState,
    ) -> bool {
        let page = node.page_index();
        match self.bands.band(state.zoom) {
            ZoomBand::PageLevel => state.is_page_cached(page) || state.is_page_visible(page),
            ZoomBand::TileLevel => {
                state.is_page_cached(page) || state.is_node_visible(node, page_bounds)
            }
            ZoomBand::VisibleOnly => state.is_node_visible(node, page_bounds),
        }
    }
}

/// Keep/discard split over a set of page trees
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResidencyPlan {
    pub keep: Vec<NodeId>,
    pub discard: Vec<NodeId>,
}

impl ResidencyPlan {
    /// Evaluate every node of every tree against `state`.
    ///
    /// Trees whose page is not in the document are discarded wholesale.
    pub fn sweep<'a>(state: &ViewState, trees: impl IntoIterator<Item = &'a PageTree>) -> Self {
        Self::sweep_with(state, trees, |page| state.bounds(page))
    }

    /// Like [`sweep`](Self::sweep), reading page bounds through `cache`
    pub fn sweep_cached<'a>(
        state: &ViewState,
        trees: impl IntoIterator<Item = &'a PageTree>,
        cache: &mut BoundsCache,
    ) -> Self {
        Self::sweep_with(state, trees, |page| cache.bounds(state, page))
    }

    fn sweep_with<'a>(
        state: &ViewState,
        trees: impl IntoIterator<Item = &'a PageTree>,
        mut bounds_of: impl FnMut(&Page) -> Rect,
    ) -> Self {
        let mut plan = Self::default();
        let document = state.document();

        for tree in trees {
            let page = document.and_then(|doc| doc.page_at(tree.page_index()));
            let Some(page) = page else {
                trace!("Page {} not in document, discarding tree", tree.page_index());
                plan.discard.extend(tree.nodes().map(|n| n.id));
                continue;
            };

            let page_bounds = bounds_of(page);
            for node in tree.nodes() {
                let keep = state.should_keep_in_memory(node, &page_bounds);
                trace!(
                    "Node {:?} level {} -> {}",
                    node.id,
                    node.level,
                    if keep { "keep" } else { "discard" }
                );
                if keep {
                    plan.keep.push(node.id);
                } else {
                    plan.discard.push(node.id);
                }
            }
        }

        debug!(
            "Residency sweep at zoom {}: keep {}, discard {}",
            state.zoom,
            plan.keep.len(),
            plan.discard.len()
        );
        plan
    }

    #[must_use]
    pub fn is_kept(&self, id: &NodeId) -> bool {
        self.keep.contains(id)
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.keep.len() + self.discard.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::controller::{VerticalScrollController, ViewController};
    use crate::geometry::Size;
    use crate::layout;
    use crate::model::PageRange;
    use crate::settings::{DocumentViewMode, PageAlign, Settings};

    /// 100 pages of 100x100, viewport over page 10
    fn state_at(zoom: f32, pages_in_memory: usize) -> ViewState {
        let sizes = vec![Size::new(100.0, 100.0); 100];
        let doc = Arc::new(layout::document(
            &sizes,
            DocumentViewMode::VerticalScroll,
            PageAlign::Auto,
            Size::new(100.0, 100.0),
        ));
        let top = 10.0 * 100.0 * zoom;
        let ctrl: Arc<dyn ViewController> = Arc::new(VerticalScrollController::new(
            Some(doc),
            Rect::new(0.0, top, 100.0, top + 100.0),
            zoom,
        ));
        let mut settings = Settings::default();
        settings.app.pages_in_memory = pages_in_memory;
        ViewState::new(ctrl, &settings)
    }

    fn root_of(page: usize) -> PageTree {
        PageTree::new(page, 0)
    }

    fn keeps(state: &ViewState, tree: &PageTree, node: usize) -> bool {
        let page = state.document().and_then(|d| d.page_at(tree.page_index())).unwrap();
        let bounds = state.bounds(page);
        state.should_keep_in_memory(tree.node(node).unwrap(), &bounds)
    }

    #[test]
    fn low_zoom_keeps_cached_page_tiles_off_screen() {
        let state = state_at(1.0, 4);
        assert_eq!(state.pages.cached(), Some(PageRange::new(8, 12)));
        let tree = root_of(12);
        let page = state.document().and_then(|d| d.page_at(12)).unwrap();
        assert!(!state.is_node_visible(tree.root(), &state.bounds(page)));
        assert!(keeps(&state, &tree, 0));
    }

    #[test]
    fn low_zoom_discards_uncached_invisible_page() {
        let state = state_at(1.0, 4);
        assert!(!keeps(&state, &root_of(30), 0));
    }

    #[test]
    fn high_zoom_discards_cached_off_screen_tile() {
        let state = state_at(3.0, 4);
        assert!(state.is_page_cached(11));
        assert!(!keeps(&state, &root_of(11), 0));
        assert!(keeps(&state, &root_of(10), 0));
    }

    #[test]
    fn middle_band_keeps_cached_or_visible() {
        let state = state_at(2.0, 4);
        assert!(keeps(&state, &root_of(12), 0));
        assert!(!keeps(&state, &root_of(40), 0));
    }

    #[test]
    fn middle_band_keeps_on_screen_tile_of_uncached_page() {
        // Window reported far away while the viewport still shows page 10
        let moved = |zoom| {
            let state = state_at(zoom, 4);
            ViewState::with_visible_range(&state, Some(PageRange::single(50)), &Settings::default())
        };

        let state = moved(2.0);
        assert!(!state.is_page_cached(10));
        let tree = PageTree::new(10, 1);
        // page 10 spans 2000..2200, viewport 2000..2100: top quadrants only
        assert!(keeps(&state, &tree, 1));
        assert!(!keeps(&state, &tree, 3));

        let low = moved(1.0);
        assert!(!keeps(&low, &PageTree::new(10, 1), 1));
    }

    #[test]
    fn high_zoom_keeps_only_on_screen_quadrants() {
        let state = state_at(3.0, 4);
        // page 10 spans 3000..3300, viewport 3000..3100 x 0..100
        let tree = PageTree::new(10, 1);
        assert!(keeps(&state, &tree, 1));
        assert!(!keeps(&state, &tree, 2));
        assert!(!keeps(&state, &tree, 3));
        assert!(!keeps(&state, &tree, 4));
    }

    #[test]
    fn sweep_splits_all_nodes() {
        let state = state_at(3.0, 4);
        let trees = vec![PageTree::new(10, 1), PageTree::new(11, 1), PageTree::new(500, 1)];
        let plan = ResidencyPlan::sweep(&state, &trees);
        assert_eq!(plan.total(), 15);
        assert_eq!(
            plan.keep,
            vec![
                NodeId { page_index: 10, node: 0 },
                NodeId { page_index: 10, node: 1 },
            ]
        );
        assert!(!plan.is_kept(&NodeId { page_index: 500, node: 0 }));
    }

    #[test]
    fn cached_sweep_matches_plain_sweep() {
        let state = state_at(2.0, 2);
        let trees: Vec<_> = (5..15).map(|page| PageTree::new(page, 2)).collect();
        let mut cache = BoundsCache::new(4);

        let plain = ResidencyPlan::sweep(&state, &trees);
        let cached = ResidencyPlan::sweep_cached(&state, &trees, &mut cache);

        assert_eq!(plain, cached);
        assert_eq!(cache.len(), 4);
    }
}
