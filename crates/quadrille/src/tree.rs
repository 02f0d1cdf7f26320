//! The public quadtree index.

use std::fmt;

use glam::Vec2;
use tracing::warn;

use crate::error::QuadTreeError;
use crate::policy::OutOfBoundsPolicy;
use crate::region::{Point, Region};
use crate::Aabb2;

/// Subdivision levels allowed below the root. Bounds the recursion when
/// more than `capacity` points share a coordinate, since no split can
/// separate them.
const MAX_SPLIT_DEPTH: u32 = 16;

/// A point-region quadtree over the area `(0, 0)..(width, height)`.
///
/// Stores 2D points with attached payloads and answers rectangle and radius
/// queries by recursive subdivision instead of a full scan. The tree is
/// single-threaded: callers that share it across threads must synchronize
/// externally, in particular around [`QuadTree::expand_by`], which replaces
/// the whole region tree.
///
/// # Type Parameters
///
/// * `T` - The type of data associated with each point.
///
/// # Example
///
/// ```
/// use glam::Vec2;
/// use quadrille::{OutOfBoundsPolicy, QuadTree};
///
/// let mut tree = QuadTree::new(50.0, 50.0, 4)
///     .unwrap()
///     .with_policy(OutOfBoundsPolicy::EXPAND);
///
/// tree.insert(Vec2::new(10.0, 10.0), "inside").unwrap();
/// // Outside the box: the expanding policy grows the tree and retries
/// assert_eq!(tree.insert(Vec2::new(80.0, 20.0), "outside"), Ok(true));
/// assert!(tree.width() >= 80.0);
/// ```
pub struct QuadTree<T> {
    width: f32,
    height: f32,
    capacity: usize,
    policy: OutOfBoundsPolicy,
    on_out_of_bounds: Option<Box<dyn FnMut()>>,
    root: Region<T>,
}

impl<T> QuadTree<T> {
    /// Creates a tree covering `(0, 0)..(width, height)` with the given
    /// per-region capacity.
    ///
    /// # Errors
    ///
    /// Returns [`QuadTreeError::InvalidGeometry`] for non-finite or
    /// non-positive dimensions and [`QuadTreeError::InvalidCapacity`] for a
    /// zero capacity. No partial tree is ever returned.
    pub fn new(width: f32, height: f32, capacity: usize) -> Result<Self, QuadTreeError> {
        if !width.is_finite() || !height.is_finite() || width <= 0.0 || height <= 0.0 {
            return Err(QuadTreeError::InvalidGeometry { width, height });
        }
        if capacity == 0 {
            return Err(QuadTreeError::InvalidCapacity);
        }
        Ok(Self {
            width,
            height,
            capacity,
            policy: OutOfBoundsPolicy::default(),
            on_out_of_bounds: None,
            root: Self::make_root(width, height, capacity),
        })
    }

    /// Sets the out-of-bounds policy, builder style.
    pub fn with_policy(mut self, policy: OutOfBoundsPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets the out-of-bounds policy.
    pub fn set_policy(&mut self, policy: OutOfBoundsPolicy) {
        self.policy = policy;
    }

    /// The active out-of-bounds policy.
    pub fn policy(&self) -> OutOfBoundsPolicy {
        self.policy
    }

    /// Installs the callback fired by [`OutOfBoundsPolicy::CALLBACK`].
    pub fn set_on_out_of_bounds(&mut self, callback: impl FnMut() + 'static) {
        self.on_out_of_bounds = Some(Box::new(callback));
    }

    /// Inserts a point with associated data.
    ///
    /// Returns `Ok(true)` if the point was stored. A point outside the tree
    /// bounds goes through the out-of-bounds policy: it may be logged,
    /// trigger expansion and a retry, fire the callback, or all of those;
    /// without an expanding retry that succeeds, the result is `Ok(false)`.
    ///
    /// # Errors
    ///
    /// Returns [`QuadTreeError::OutOfBounds`] for an out-of-bounds point
    /// when [`OutOfBoundsPolicy::FAIL`] is set.
    pub fn insert(&mut self, position: Vec2, data: T) -> Result<bool, QuadTreeError> {
        if self.root.bounds().contains_point(position) {
            return Ok(self.root.insert(Point::new(position, data)));
        }
        self.handle_out_of_bounds(position, data)
    }

    /// Inserts every point from an iterator.
    ///
    /// Each insertion is independent; rejected points do not stop the
    /// sequence. Only [`OutOfBoundsPolicy::FAIL`] aborts early, by
    /// propagating the first error.
    pub fn insert_all<I>(&mut self, points: I) -> Result<(), QuadTreeError>
    where
        I: IntoIterator<Item = (Vec2, T)>,
    {
        for (position, data) in points {
            self.insert(position, data)?;
        }
        Ok(())
    }

    /// Grows the tree so the area covers at least `(x, y)`.
    ///
    /// Dimensions never shrink; a point already covered leaves the tree
    /// untouched. Growing rebuilds the entire region tree and reinserts
    /// every stored point, which is O(n).
    pub fn expand_to(&mut self, x: f32, y: f32) {
        self.expand_by(x - self.width, y - self.height);
    }

    /// Grows the tree by the given deltas. Negative or non-finite deltas
    /// clamp to zero; see [`QuadTree::expand_to`] for the rebuild cost.
    pub fn expand_by(&mut self, d_width: f32, d_height: f32) {
        let d_width = if d_width.is_finite() { d_width.max(0.0) } else { 0.0 };
        let d_height = if d_height.is_finite() { d_height.max(0.0) } else { 0.0 };
        if d_width == 0.0 && d_height == 0.0 {
            return;
        }
        self.width += d_width;
        self.height += d_height;
        self.rebuild();
    }

    /// Collects all points in the query box. See [`Region::query_range`];
    /// result order is unspecified.
    pub fn query_region(&self, region: &Aabb2) -> impl Iterator<Item = (Vec2, &T)> {
        let mut out = Vec::new();
        self.root.query_range(region, &mut out);
        out.into_iter().map(|point| (point.position, &point.data))
    }

    /// Queries the rectangle with top-left corner `origin` and the given
    /// size.
    pub fn query_rect(&self, origin: Vec2, size: Vec2) -> impl Iterator<Item = (Vec2, &T)> {
        self.query_region(&Aabb2::new(origin, origin + size))
    }

    /// Queries the rectangle of the given size centered on `center`.
    pub fn query_rect_centered(&self, center: Vec2, size: Vec2) -> impl Iterator<Item = (Vec2, &T)> {
        self.query_region(&Aabb2::from_center_half_extents(center, size * 0.5))
    }

    /// Collects all points within `radius` of `center` (boundary included).
    ///
    /// Candidates come from the square circumscribing the circle, so only
    /// the subtrees intersecting that square are visited; the exact check
    /// is on squared Euclidean distance.
    pub fn query_radius(&self, center: Vec2, radius: f32) -> impl Iterator<Item = (Vec2, &T)> {
        let radius_sq = radius * radius;
        self.query_rect_centered(center, Vec2::splat(radius * 2.0))
            .filter(move |(position, _)| position.distance_squared(center) <= radius_sq)
    }

    /// Every stored point, in unspecified order.
    pub fn points(&self) -> impl Iterator<Item = (Vec2, &T)> {
        self.root
            .all_points()
            .into_iter()
            .map(|point| (point.position, &point.data))
    }

    /// The points held directly by the root region: a low-level inspection
    /// primitive, empty once the root has subdivided.
    pub fn root_points(&self) -> &[Point<T>] {
        self.root.points()
    }

    /// The root region, for callers that walk the tree structure (e.g. to
    /// build a serializable representation).
    pub fn root(&self) -> &Region<T> {
        &self.root
    }

    /// Total number of stored points.
    pub fn len(&self) -> usize {
        self.root.len()
    }

    /// True if no points are stored.
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// The box covered by the tree: `(0, 0)..(width, height)`.
    pub fn bounds(&self) -> Aabb2 {
        self.root.bounds()
    }

    /// Indexed width.
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Indexed height.
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Per-region capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Applies the policy flags to an out-of-bounds point, in fixed order:
    /// log, expand-and-retry, callback, fail.
    fn handle_out_of_bounds(&mut self, position: Vec2, data: T) -> Result<bool, QuadTreeError> {
        let mut inserted = false;
        if self.policy.contains(OutOfBoundsPolicy::LOG) {
            warn!(
                "point ({}, {}) is outside the quadtree bounds",
                position.x, position.y
            );
        }
        if self.policy.contains(OutOfBoundsPolicy::EXPAND) {
            self.expand_to(position.x, position.y);
            // Retry once. Negative coordinates stay outside the
            // origin-anchored box, so the retry can still reject.
            if self.root.bounds().contains_point(position) {
                inserted = self.root.insert(Point::new(position, data));
            }
        }
        if self.policy.contains(OutOfBoundsPolicy::CALLBACK) {
            if let Some(callback) = &mut self.on_out_of_bounds {
                callback();
            }
        }
        if self.policy.contains(OutOfBoundsPolicy::FAIL) {
            return Err(QuadTreeError::OutOfBounds {
                x: position.x,
                y: position.y,
            });
        }
        Ok(inserted)
    }

    /// Quadrant boundaries are relative to the root box, so growing the box
    /// means rebuilding the whole tree from the stored points.
    fn rebuild(&mut self) {
        let mut points = Vec::with_capacity(self.root.len());
        self.root.drain_into(&mut points);
        self.root = Self::make_root(self.width, self.height, self.capacity);
        for point in points {
            // Every drained point lies inside the grown box
            self.root.insert(point);
        }
    }

    fn make_root(width: f32, height: f32, capacity: usize) -> Region<T> {
        Region::new(
            Aabb2::new(Vec2::ZERO, Vec2::new(width, height)),
            capacity,
            MAX_SPLIT_DEPTH,
        )
    }
}

impl<T> fmt::Debug for QuadTree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuadTree")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("capacity", &self.capacity)
            .field("policy", &self.policy)
            .field("len", &self.len())
            .finish()
    }
}
