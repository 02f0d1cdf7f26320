//! Serialization for quadrille quadtrees.
//!
//! The live tree stores payloads of an arbitrary type `T`, which cannot be
//! serialized directly. This crate solves this by:
//!
//! 1. Converting a tree to an intermediate [`SerialTree`] where each
//!    payload is represented as a `serde_json::Value`, produced by a
//!    caller-supplied extraction closure
//! 2. Rendering the intermediate structure as JSON for debugging or
//!    persistence
//!
//! The intermediate structure mirrors the tree exactly: per region, its
//! bounds, its directly-held points, and its four children in canonical
//! quadrant order, with children omitted for leaves.
//!
//! # Example
//!
//! ```
//! use glam::Vec2;
//! use quadrille::QuadTree;
//! use quadrille_serde::{to_json_pretty, tree_to_serial_value};
//!
//! let mut tree = QuadTree::new(100.0, 100.0, 4).unwrap();
//! tree.insert(Vec2::new(10.0, 20.0), "a").unwrap();
//!
//! let serial = tree_to_serial_value(&tree).unwrap();
//! let json = to_json_pretty(&serial).unwrap();
//! assert!(json.contains("\"a\""));
//! ```

mod error;
mod serial;

pub use crate::error::SerdeError;
pub use crate::serial::{SerialAabb, SerialPoint, SerialRegion, SerialTree};

use quadrille::{QuadTree, Region};
use serde::Serialize;
use serde_json::Value as JsonValue;

/// Converts a tree to its serializable representation.
///
/// The extraction closure turns each payload into a JSON value; returning
/// `None` marks the payload as unserializable and aborts the conversion.
///
/// # Errors
///
/// Returns [`SerdeError::NotSerializable`] if the closure returns `None`
/// for any stored payload.
pub fn tree_to_serial<T, F>(tree: &QuadTree<T>, extract: F) -> Result<SerialTree, SerdeError>
where
    F: Fn(&T) -> Option<JsonValue>,
{
    Ok(SerialTree {
        width: tree.width(),
        height: tree.height(),
        capacity: tree.capacity(),
        root: region_to_serial(tree.root(), &extract)?,
    })
}

/// Converts a tree whose payloads implement `Serialize`.
///
/// # Errors
///
/// Returns [`SerdeError::NotSerializable`] if a payload rejects JSON
/// conversion (e.g. a map with non-string keys).
pub fn tree_to_serial_value<T: Serialize>(tree: &QuadTree<T>) -> Result<SerialTree, SerdeError> {
    tree_to_serial(tree, |data| serde_json::to_value(data).ok())
}

/// Renders a serial tree as compact JSON.
///
/// # Errors
///
/// Returns [`SerdeError::Json`] if encoding fails.
pub fn to_json(serial: &SerialTree) -> Result<String, SerdeError> {
    Ok(serde_json::to_string(serial)?)
}

/// Renders a serial tree as human-readable, indented JSON.
///
/// # Errors
///
/// Returns [`SerdeError::Json`] if encoding fails.
pub fn to_json_pretty(serial: &SerialTree) -> Result<String, SerdeError> {
    Ok(serde_json::to_string_pretty(serial)?)
}

fn region_to_serial<T, F>(region: &Region<T>, extract: &F) -> Result<SerialRegion, SerdeError>
where
    F: Fn(&T) -> Option<JsonValue>,
{
    let mut points = Vec::with_capacity(region.points().len());
    for point in region.points() {
        let data = extract(&point.data)
            .ok_or_else(|| SerdeError::NotSerializable(std::any::type_name::<T>().to_string()))?;
        points.push(SerialPoint {
            x: point.x(),
            y: point.y(),
            data,
        });
    }

    let children = match region.children() {
        Some([tl, tr, bl, br]) => Some(Box::new([
            region_to_serial(tl, extract)?,
            region_to_serial(tr, extract)?,
            region_to_serial(bl, extract)?,
            region_to_serial(br, extract)?,
        ])),
        None => None,
    };

    Ok(SerialRegion {
        bounds: region.bounds().into(),
        points,
        children,
    })
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;

    fn sample_tree() -> QuadTree<&'static str> {
        let mut tree = QuadTree::new(100.0, 100.0, 2).unwrap();
        tree.insert(Vec2::new(10.0, 10.0), "a").unwrap();
        tree.insert(Vec2::new(20.0, 20.0), "b").unwrap();
        tree.insert(Vec2::new(80.0, 80.0), "c").unwrap();
        tree
    }

    #[test]
    fn test_leaf_tree_serializes_without_children() {
        let mut tree = QuadTree::new(50.0, 50.0, 4).unwrap();
        tree.insert(Vec2::new(10.0, 10.0), "only").unwrap();

        let serial = tree_to_serial_value(&tree).unwrap();
        assert!(serial.root.children.is_none());
        assert_eq!(serial.root.points.len(), 1);
        assert_eq!(serial.width, 50.0);
        assert_eq!(serial.capacity, 4);

        let json = to_json(&serial).unwrap();
        assert!(!json.contains("children"));
    }

    #[test]
    fn test_subdivided_tree_mirrors_structure() {
        let tree = sample_tree();
        let serial = tree_to_serial_value(&tree).unwrap();

        // The third insert subdivided the root
        assert!(serial.root.points.is_empty());
        let children = serial.root.children.as_ref().unwrap();
        assert_eq!(serial.root.len(), tree.len());
        assert_eq!(children[0].len(), 2); // "a" and "b" in the top-left
        assert_eq!(children[3].len(), 1); // "c" in the bottom-right
    }

    #[test]
    fn test_payload_values_survive() {
        let tree = sample_tree();
        let serial = tree_to_serial_value(&tree).unwrap();
        let json = to_json(&serial).unwrap();

        for label in ["\"a\"", "\"b\"", "\"c\""] {
            assert!(json.contains(label), "payload {label} missing from JSON");
        }
    }

    #[test]
    fn test_extractor_none_aborts() {
        let tree = sample_tree();
        let result = tree_to_serial(&tree, |data| {
            if *data == "b" {
                None
            } else {
                Some(serde_json::json!(data))
            }
        });
        assert!(matches!(result, Err(SerdeError::NotSerializable(_))));
    }

    #[test]
    fn test_custom_extractor_shapes_payload() {
        let mut tree = QuadTree::new(100.0, 100.0, 4).unwrap();
        tree.insert(Vec2::new(5.0, 5.0), 7u32).unwrap();

        let serial = tree_to_serial(&tree, |id| {
            Some(serde_json::json!({ "id": id, "kind": "sensor" }))
        })
        .unwrap();
        assert_eq!(serial.root.points[0].data["kind"], "sensor");
        assert_eq!(serial.root.points[0].data["id"], 7);
    }

    #[test]
    fn test_pretty_json_is_indented() {
        let tree = sample_tree();
        let serial = tree_to_serial_value(&tree).unwrap();
        let pretty = to_json_pretty(&serial).unwrap();
        assert!(pretty.contains('\n'));
        assert!(pretty.len() > to_json(&serial).unwrap().len());
    }
}
