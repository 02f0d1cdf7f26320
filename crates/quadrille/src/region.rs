//! Tree nodes and the points they hold.

use glam::Vec2;

use crate::Aabb2;

/// A point with associated data stored in a quadtree.
///
/// Points are immutable once stored. The index requires no equality or
/// identity on them; duplicate coordinates are permitted and stored
/// independently.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point<T> {
    /// Position in the tree's coordinate space.
    pub position: Vec2,
    /// Payload carried with the point.
    pub data: T,
}

impl<T> Point<T> {
    /// Creates a new point.
    pub fn new(position: Vec2, data: T) -> Self {
        Self { position, data }
    }

    /// The point's x coordinate.
    pub fn x(&self) -> f32 {
        self.position.x
    }

    /// The point's y coordinate.
    pub fn y(&self) -> f32 {
        self.position.y
    }
}

/// A node of the quadtree.
///
/// A region is either a leaf holding up to `capacity` points, or an internal
/// node owning four children that exactly quarter its box (top-left,
/// top-right, bottom-left, bottom-right). Internal nodes hold no points:
/// the insertion that overflows a leaf subdivides it and redistributes
/// every held point into the children.
#[derive(Debug)]
pub struct Region<T> {
    bounds: Aabb2,
    capacity: usize,
    /// Subdivisions still allowed below this node. A leaf with an exhausted
    /// budget accepts points beyond capacity instead of splitting, which
    /// bounds recursion when more than `capacity` points share a coordinate.
    split_budget: u32,
    points: Vec<Point<T>>,
    children: Option<Box<[Region<T>; 4]>>,
}

impl<T> Region<T> {
    pub(crate) fn new(bounds: Aabb2, capacity: usize, split_budget: u32) -> Self {
        Self {
            bounds,
            capacity,
            split_budget,
            points: Vec::new(),
            children: None,
        }
    }

    /// The box this region covers.
    pub fn bounds(&self) -> Aabb2 {
        self.bounds
    }

    /// True if this region has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// The points held directly by this region. Empty for internal nodes.
    pub fn points(&self) -> &[Point<T>] {
        &self.points
    }

    /// The four children, in canonical quadrant order, if this region has
    /// subdivided.
    pub fn children(&self) -> Option<&[Region<T>; 4]> {
        self.children.as_deref()
    }

    /// Total number of points stored in this subtree.
    pub fn len(&self) -> usize {
        match &self.children {
            None => self.points.len(),
            Some(children) => children.iter().map(Region::len).sum(),
        }
    }

    /// True if the subtree stores no points.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Inserts a point into this subtree.
    ///
    /// Returns false, without mutating anything, for a point outside this
    /// region's box; a correctly functioning caller never passes one.
    pub(crate) fn insert(&mut self, point: Point<T>) -> bool {
        if !self.bounds.contains_point(point.position) {
            return false;
        }

        if let Some(children) = &mut self.children {
            return Self::route(children, point);
        }

        if self.points.len() < self.capacity || self.split_budget == 0 {
            self.points.push(point);
            return true;
        }

        // Leaf at capacity: quarter the box and move every held point,
        // plus the new one, down into the children.
        let capacity = self.capacity;
        let budget = self.split_budget - 1;
        let mut children = Box::new(
            self.bounds
                .quadrants()
                .map(|quadrant| Region::new(quadrant, capacity, budget)),
        );
        for held in self.points.drain(..) {
            Self::route(&mut children, held);
        }
        let inserted = Self::route(&mut children, point);
        self.children = Some(children);
        inserted
    }

    /// Routes a point to the first child whose closed box contains it.
    ///
    /// The fixed order (top-left, top-right, bottom-left, bottom-right)
    /// resolves points lying exactly on shared quadrant boundaries.
    fn route(children: &mut [Region<T>; 4], point: Point<T>) -> bool {
        match children
            .iter()
            .position(|child| child.bounds.contains_point(point.position))
        {
            Some(index) => children[index].insert(point),
            None => false,
        }
    }

    /// Collects every point in this subtree whose position lies in `range`.
    ///
    /// Subtrees whose boxes do not intersect the query box are pruned.
    /// Result order is unspecified.
    pub fn query_range<'a>(&'a self, range: &Aabb2, out: &mut Vec<&'a Point<T>>) {
        if !self.bounds.intersects(range) {
            return;
        }
        for point in &self.points {
            if range.contains_point(point.position) {
                out.push(point);
            }
        }
        if let Some(children) = &self.children {
            for child in children.iter() {
                child.query_range(range, out);
            }
        }
    }

    /// Collects every point stored in this subtree. Each stored point lives
    /// in exactly one leaf, so the result has no duplicates.
    pub fn all_points(&self) -> Vec<&Point<T>> {
        let mut out = Vec::with_capacity(self.len());
        self.collect_points(&mut out);
        out
    }

    fn collect_points<'a>(&'a self, out: &mut Vec<&'a Point<T>>) {
        out.extend(self.points.iter());
        if let Some(children) = &self.children {
            for child in children.iter() {
                child.collect_points(out);
            }
        }
    }

    /// Moves every stored point out of this subtree, leaving it empty.
    /// Used when the tree is rebuilt after growing.
    pub(crate) fn drain_into(&mut self, out: &mut Vec<Point<T>>) {
        out.append(&mut self.points);
        if let Some(children) = self.children.take() {
            for mut child in *children {
                child.drain_into(out);
            }
        }
    }
}
