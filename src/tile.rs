//! Renderable tiles
//!
//! Each page is decomposed into a quadtree of slices. A slice is a
//! fractional sub-rectangle of its page, so a tile's on-screen rectangle
//! follows the page through every zoom and scroll without being rebuilt.

use crate::geometry::Rect;

/// Deepest decomposition a tree is built to
pub const MAX_TREE_DEPTH: u8 = 4;

/// Position of a node inside its page tree
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    pub page_index: usize,
    /// Index into the owning tree's node list, 0 is the root
    pub node: usize,
}

/// A rectangular slice of one page at a subdivision level
#[derive(Clone, Debug, PartialEq)]
pub struct PageTreeNode {
    pub id: NodeId,
    /// 0 for the whole page, +1 per subdivision
    pub level: u8,
    /// Fractional bounds inside the page, each edge in `[0, 1]`
    pub slice: Rect,
    /// Child node indices, empty for leaves
    pub children: Vec<usize>,
}

impl PageTreeNode {
    #[must_use]
    pub fn page_index(&self) -> usize {
        self.id.page_index
    }

    /// Rectangle this tile covers, given its page's bounds at the current zoom
    #[must_use]
    pub fn target_rect(&self, page_bounds: &Rect) -> Rect {
        page_bounds.map_slice(&self.slice)
    }

    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Quadtree of tiles for one page
#[derive(Clone, Debug)]
pub struct PageTree {
    page_index: usize,
    nodes: Vec<PageTreeNode>,
}

impl PageTree {
    /// Build a tree that splits each node into four quadrants down to `depth`
    #[must_use]
    pub fn new(page_index: usize, depth: u8) -> Self {
        let depth = depth.min(MAX_TREE_DEPTH);
        let mut tree = Self {
            page_index,
            nodes: Vec::new(),
        };
        tree.push(0, Rect::UNIT, depth);
        tree
    }

    fn push(&mut self, level: u8, slice: Rect, depth: u8) -> usize {
        let index = self.nodes.len();
        self.nodes.push(PageTreeNode {
            id: NodeId {
                page_index: self.page_index,
                node: index,
            },
            level,
            slice,
            children: Vec::new(),
        });

        if level < depth {
            let mid_x = (slice.left + slice.right) * 0.5;
            let mid_y = (slice.top + slice.bottom) * 0.5;
            let quadrants = [
                Rect::new(slice.left, slice.top, mid_x, mid_y),
                Rect::new(mid_x, slice.top, slice.right, mid_y),
                Rect::new(slice.left, mid_y, mid_x, slice.bottom),
                Rect::new(mid_x, mid_y, slice.right, slice.bottom),
            ];
            let children: Vec<usize> = quadrants
                .into_iter()
                .map(|quadrant| self.push(level + 1, quadrant, depth))
                .collect();
            self.nodes[index].children = children;
        }
        index
    }

    /// Tree depth suited to a zoom factor: one extra level per doubling
    #[must_use]
    pub fn depth_for_zoom(zoom: f32) -> u8 {
        if !zoom.is_finite() || zoom <= 1.0 {
            return 0;
        }
        (zoom.log2().ceil() as u8).min(MAX_TREE_DEPTH)
    }

    #[must_use]
    pub fn page_index(&self) -> usize {
        self.page_index
    }

    #[must_use]
    pub fn root(&self) -> &PageTreeNode {
        &self.nodes[0]
    }

    #[must_use]
    pub fn node(&self, index: usize) -> Option<&PageTreeNode> {
        self.nodes.get(index)
    }

    /// Every node, root first, depth-first
    pub fn nodes(&self) -> impl Iterator<Item = &PageTreeNode> {
        self.nodes.iter()
    }

    pub fn leaves(&self) -> impl Iterator<Item = &PageTreeNode> {
        self.nodes.iter().filter(|n| n.is_leaf())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false, a tree holds at least its root
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
