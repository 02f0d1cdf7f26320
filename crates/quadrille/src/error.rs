//! Quadtree error types.

use thiserror::Error;

/// Errors that can occur when constructing or inserting into a quadtree.
///
/// Construction errors are fatal (no partial tree is returned). An
/// out-of-bounds insertion is only an error when the failing policy flag is
/// set; otherwise it is reported through the `Ok(false)` return value.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum QuadTreeError {
    /// Insertion target lies outside the root bounds.
    #[error("point ({x}, {y}) is outside the quadtree bounds")]
    OutOfBounds { x: f32, y: f32 },

    /// Tree dimensions were non-finite or not positive.
    #[error("invalid quadtree dimensions {width}x{height}")]
    InvalidGeometry { width: f32, height: f32 },

    /// Region capacity must hold at least one point.
    #[error("region capacity must be at least 1")]
    InvalidCapacity,
}
