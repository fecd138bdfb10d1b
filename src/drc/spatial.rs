//! R-tree candidate index
//!
//! Items are indexed by their bounding boxes. A query grows the probe box by
//! a margin (the worst clearance any rule can ask for) so that a pair that
//! could violate is never dropped before the exact test.

use rstar::{RTree, RTreeObject, AABB};

use crate::geometry::{widen, Box2I, Coord};

use super::board::CopperItem;

/// Index of an item in the slice the tree was built from
#[derive(Debug, Clone, Copy)]
pub struct IndexedBox {
    pub index: usize,
    envelope: AABB<[i64; 2]>,
}

fn aabb(bbox: &Box2I, margin: Coord) -> AABB<[i64; 2]> {
    let b = bbox.normalized();
    let m = widen(margin);
    AABB::from_corners(
        [widen(b.left()) - m, widen(b.top()) - m],
        [widen(b.right()) + m, widen(b.bottom()) + m],
    )
}

impl RTreeObject for IndexedBox {
    type Envelope = AABB<[i64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

pub struct SpatialIndex {
    tree: RTree<IndexedBox>,
}

impl SpatialIndex {
    /// Bulk-load the bounding boxes of `items`
    pub fn new(items: &[CopperItem<'_>]) -> Self {
        let boxes = items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.bbox.is_initialized())
            .map(|(index, item)| IndexedBox {
                index,
                envelope: aabb(&item.bbox, 0),
            })
            .collect();

        Self {
            tree: RTree::bulk_load(boxes),
        }
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Indices of items whose boxes touch `bbox` grown by `margin`, sorted
    pub fn candidates(&self, bbox: &Box2I, margin: Coord) -> Vec<usize> {
        if !bbox.is_initialized() {
            return Vec::new();
        }

        let mut found: Vec<usize> = self
            .tree
            .locate_in_envelope_intersecting(&aabb(bbox, margin))
            .map(|b| b.index)
            .collect();
        found.sort_unstable();
        found
    }
}
