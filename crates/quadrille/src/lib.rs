//! Point-region quadtree for 2D range and radius queries.
//!
//! This crate stores 2D points with arbitrary attached payloads and answers
//! axis-aligned range queries and radius queries without scanning every
//! stored point:
//!
//! - [`Aabb2`] - axis-aligned box with containment/intersection predicates
//! - [`Point`] - an immutable position/payload pair
//! - [`Region`] - a tree node, either a leaf holding points or an internal
//!   node owning four quadrant children
//! - [`QuadTree`] - the public index, with configurable capacity and
//!   out-of-bounds policy
//!
//! Coordinates follow the screen convention: x grows to the right, y grows
//! downward, and the indexed area is anchored at the origin, so "top-left"
//! names the quadrant nearest `(0, 0)`.
//!
//! # Example
//!
//! ```
//! use glam::Vec2;
//! use quadrille::QuadTree;
//!
//! let mut tree = QuadTree::new(100.0, 100.0, 4).unwrap();
//!
//! // Insert points with associated data
//! tree.insert(Vec2::new(10.0, 20.0), "point A").unwrap();
//! tree.insert(Vec2::new(50.0, 50.0), "point B").unwrap();
//!
//! // Query points in a rectangle anchored at the top-left corner
//! let results: Vec<_> = tree.query_rect(Vec2::ZERO, Vec2::splat(30.0)).collect();
//! assert_eq!(results.len(), 1);
//! ```

use glam::Vec2;

mod error;
mod policy;
mod region;
mod tree;

pub use error::QuadTreeError;
pub use policy::OutOfBoundsPolicy;
pub use region::{Point, Region};
pub use tree::QuadTree;

// ============================================================================
// AABB
// ============================================================================

/// 2D axis-aligned bounding box.
///
/// Boxes are normalized at construction so `min.x <= max.x` and
/// `min.y <= max.y` always hold, and are immutable afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Aabb2 {
    /// Minimum corner (top-left in screen coordinates).
    pub min: Vec2,
    /// Maximum corner (bottom-right in screen coordinates).
    pub max: Vec2,
}

impl Aabb2 {
    /// Creates a new AABB from two opposite corners, in either order.
    pub fn new(a: Vec2, b: Vec2) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Creates an AABB from center and half-extents.
    pub fn from_center_half_extents(center: Vec2, half_extents: Vec2) -> Self {
        Self::new(center - half_extents, center + half_extents)
    }

    /// Returns the center of the AABB.
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Returns the half-extents (half-size) of the AABB.
    pub fn half_extents(&self) -> Vec2 {
        (self.max - self.min) * 0.5
    }

    /// Returns the size of the AABB.
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Checks if this AABB contains a point. Inclusive on all four edges.
    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    /// Checks if this AABB intersects another AABB. Touching edges count.
    pub fn intersects(&self, other: &Aabb2) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    /// Returns the four equal quadrants of this AABB.
    ///
    /// Canonical order: top-left, top-right, bottom-left, bottom-right
    /// ("top" rows have the smaller y values). Adjacent quadrants share
    /// their boundary lines; a point on a shared edge is resolved by taking
    /// the first quadrant in this order that contains it.
    pub fn quadrants(&self) -> [Aabb2; 4] {
        let center = self.center();
        [
            // Top-left
            Aabb2::new(self.min, center),
            // Top-right
            Aabb2::new(
                Vec2::new(center.x, self.min.y),
                Vec2::new(self.max.x, center.y),
            ),
            // Bottom-left
            Aabb2::new(
                Vec2::new(self.min.x, center.y),
                Vec2::new(center.x, self.max.y),
            ),
            // Bottom-right
            Aabb2::new(center, self.max),
        ]
    }
}

// ============================================================================
// Tests
// ============================================================================


// ============================================================================
// Invariant tests
// ============================================================================

/// Invariant tests for the quadtree.
///
/// These tests verify mathematical properties that should hold for the
/// index regardless of input. Run with:
///
/// ```sh
/// cargo test -p quadrille --features invariant-tests
/// ```
#[cfg(all(test, feature = "invariant-tests"))]
mod invariant_tests {
    use super::*;

    /// Range query returns exactly the brute-force set.
    #[test]
    fn test_range_query_matches_brute_force() {
        let mut tree = QuadTree::new(100.0, 100.0, 4).unwrap();

        let mut points = Vec::new();
        for i in 0..200usize {
            let point = Vec2::new(rand_f32(0.0, 100.0), rand_f32(0.0, 100.0));
            points.push(point);
            assert_eq!(tree.insert(point, i), Ok(true));
        }

        for _ in 0..20 {
            let a = Vec2::new(rand_f32(0.0, 100.0), rand_f32(0.0, 100.0));
            let b = Vec2::new(rand_f32(0.0, 100.0), rand_f32(0.0, 100.0));
            let query = Aabb2::new(a, b);

            let mut got: Vec<usize> = tree.query_region(&query).map(|(_, i)| *i).collect();
            got.sort_unstable();

            let mut want: Vec<usize> = points
                .iter()
                .enumerate()
                .filter(|(_, p)| query.contains_point(**p))
                .map(|(i, _)| i)
                .collect();
            want.sort_unstable();

            assert_eq!(got, want, "range query diverged from brute force");
        }
    }

    /// Radius query returns exactly the squared-distance filter set.
    #[test]
    fn test_radius_query_matches_brute_force() {
        let mut tree = QuadTree::new(100.0, 100.0, 4).unwrap();

        let mut points = Vec::new();
        for i in 0..200usize {
            let point = Vec2::new(rand_f32(0.0, 100.0), rand_f32(0.0, 100.0));
            points.push(point);
            assert_eq!(tree.insert(point, i), Ok(true));
        }

        for _ in 0..20 {
            let center = Vec2::new(rand_f32(0.0, 100.0), rand_f32(0.0, 100.0));
            let radius = rand_f32(1.0, 40.0);

            let mut got: Vec<usize> = tree.query_radius(center, radius).map(|(_, i)| *i).collect();
            got.sort_unstable();

            let mut want: Vec<usize> = points
                .iter()
                .enumerate()
                .filter(|(_, p)| p.distance_squared(center) <= radius * radius)
                .map(|(i, _)| i)
                .collect();
            want.sort_unstable();

            assert_eq!(got, want, "radius query diverged from brute force");
        }
    }

    /// Every stored point lies inside its leaf's box and every ancestor box.
    #[test]
    fn test_containment_invariant() {
        let mut tree = QuadTree::new(100.0, 100.0, 2).unwrap();
        for i in 0..200 {
            let point = Vec2::new(rand_f32(0.0, 100.0), rand_f32(0.0, 100.0));
            assert_eq!(tree.insert(point, i), Ok(true));
        }

        fn check<T>(region: &Region<T>) {
            for point in region.points() {
                assert!(
                    region.bounds().contains_point(point.position),
                    "point {:?} escaped its region {:?}",
                    point.position,
                    region.bounds()
                );
            }
            if let Some(children) = region.children() {
                assert!(
                    region.points().is_empty(),
                    "internal node still holds points"
                );
                for child in children.iter() {
                    // Child boxes stay inside the parent box
                    assert!(region.bounds().contains_point(child.bounds().min));
                    assert!(region.bounds().contains_point(child.bounds().max));
                    check(child);
                }
            }
        }
        check(tree.root());
    }

    /// Count conservation across expansion.
    #[test]
    fn test_expand_conserves_points() {
        let mut tree = QuadTree::new(100.0, 100.0, 4).unwrap();
        for i in 0..150usize {
            let point = Vec2::new(rand_f32(0.0, 100.0), rand_f32(0.0, 100.0));
            assert_eq!(tree.insert(point, i), Ok(true));
        }
        let before: Vec<_> = {
            let mut v: Vec<usize> = tree.points().map(|(_, i)| *i).collect();
            v.sort_unstable();
            v
        };

        tree.expand_by(rand_f32(0.0, 500.0), rand_f32(0.0, 500.0));

        let mut after: Vec<usize> = tree.points().map(|(_, i)| *i).collect();
        after.sort_unstable();
        assert_eq!(before, after, "expansion lost or duplicated points");
    }

    // ========================================================================
    // Helper functions
    // ========================================================================

    /// Simple LCG random number generator for tests.
    fn rand_f32(min: f32, max: f32) -> f32 {
        use std::cell::Cell;
        thread_local! {
            static SEED: Cell<u64> = const { Cell::new(12345) };
        }
        SEED.with(|seed| {
            let s = seed.get().wrapping_mul(6364136223846793005).wrapping_add(1);
            seed.set(s);
            let t = ((s >> 33) as u32) as f32 / u32::MAX as f32;
            min + t * (max - min)
        })
    }
}
