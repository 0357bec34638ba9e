//! Spatial Index Module
//!
//! R-tree over element bounds for pointer-down hit testing. Entries carry the
//! element's paint index so the topmost hit can be picked without walking
//! the element list.

use crate::geometry::{Point, Rect};
use crate::types::{CertificateElement, ElementId};
use rstar::{AABB, RTree, RTreeObject};

/// A spatial entry representing one element's bounding box.
#[derive(Debug, Clone)]
pub struct SpatialEntry {
    pub element_id: ElementId,
    /// Paint order; higher is on top
    pub z: usize,
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl SpatialEntry {
    pub fn new(element_id: ElementId, z: usize, bounds: Rect) -> Self {
        Self {
            element_id,
            z,
            min_x: bounds.x,
            min_y: bounds.y,
            max_x: bounds.right(),
            max_y: bounds.bottom(),
        }
    }

    #[inline]
    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }
}

impl RTreeObject for SpatialEntry {
    type Envelope = AABB<[f32; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners([self.min_x, self.min_y], [self.max_x, self.max_y])
    }
}

impl PartialEq for SpatialEntry {
    fn eq(&self, other: &Self) -> bool {
        self.element_id == other.element_id
    }
}

/// Spatial index for template elements.
pub struct SpatialIndex {
    tree: RTree<SpatialEntry>,
    /// Template revision the tree was built from
    revision: Option<u64>,
}

impl SpatialIndex {
    pub fn new() -> Self {
        Self {
            tree: RTree::new(),
            revision: None,
        }
    }

    /// Build from elements in paint order.
    pub fn from_elements(elements: &[CertificateElement]) -> Self {
        let mut index = Self::new();
        index.rebuild(elements);
        index
    }

    pub fn rebuild(&mut self, elements: &[CertificateElement]) {
        let entries: Vec<SpatialEntry> = elements
            .iter()
            .enumerate()
            .map(|(z, e)| SpatialEntry::new(e.id.clone(), z, e.bounds()))
            .collect();
        self.tree = RTree::bulk_load(entries);
    }

    /// Rebuild only if the template revision moved since the last build.
    pub fn sync(&mut self, elements: &[CertificateElement], revision: u64) {
        if self.revision != Some(revision) {
            self.rebuild(elements);
            self.revision = Some(revision);
        }
    }

    /// All elements containing the canvas point, in no particular order.
    pub fn query_point(&self, point: Point) -> Vec<ElementId> {
        self.hits(point).map(|entry| entry.element_id.clone()).collect()
    }

    /// The topmost element containing the canvas point.
    pub fn topmost_at(&self, point: Point) -> Option<ElementId> {
        self.hits(point)
            .max_by_key(|entry| entry.z)
            .map(|entry| entry.element_id.clone())
    }

    fn hits(&self, point: Point) -> impl Iterator<Item = &SpatialEntry> {
        self.tree
            .locate_in_envelope_intersecting(&AABB::from_point([point.x, point.y]))
            .filter(move |entry| entry.contains_point(point.x, point.y))
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

impl Default for SpatialIndex {
    fn default() -> Self {
        Self::new()
    }
}
