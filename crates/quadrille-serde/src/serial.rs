//! Serializable intermediate representations of quadtree structures.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use quadrille::Aabb2;

/// Serializable representation of an axis-aligned box.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerialAabb {
    /// Minimum corner as `[x, y]`.
    pub min: [f32; 2],
    /// Maximum corner as `[x, y]`.
    pub max: [f32; 2],
}

impl From<Aabb2> for SerialAabb {
    fn from(aabb: Aabb2) -> Self {
        Self {
            min: aabb.min.to_array(),
            max: aabb.max.to_array(),
        }
    }
}

/// Serializable representation of a stored point.
///
/// The payload is held as a JSON value produced by the extraction closure
/// passed to the conversion, so any payload type can be represented.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerialPoint {
    pub x: f32,
    pub y: f32,
    /// Payload in JSON form.
    pub data: JsonValue,
}

/// Serializable representation of one region node.
///
/// Children appear in canonical quadrant order (top-left, top-right,
/// bottom-left, bottom-right) and are omitted entirely for leaves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerialRegion {
    /// The box this region covers.
    pub bounds: SerialAabb,
    /// Points held directly by this region. Empty for internal nodes.
    pub points: Vec<SerialPoint>,
    /// The four children, present only once the region has subdivided.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Box<[SerialRegion; 4]>>,
}

impl SerialRegion {
    /// Number of points stored in this subtree.
    pub fn len(&self) -> usize {
        let held = self.points.len();
        match &self.children {
            None => held,
            Some(children) => held + children.iter().map(SerialRegion::len).sum::<usize>(),
        }
    }

    /// True if the subtree stores no points.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Serializable representation of an entire quadtree.
///
/// This is the plain structure handed to text rendering; it defines no wire
/// format of its own beyond what `serde` derives provide.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerialTree {
    /// Indexed width.
    pub width: f32,
    /// Indexed height.
    pub height: f32,
    /// Per-region capacity.
    pub capacity: usize,
    /// The root region.
    pub root: SerialRegion,
}
