//! Map Subset Library - Bounding-box clipping of longitude-latitude vector data
//!
//! This library reduces large line and polygon datasets (coastlines, region boundaries,
//! tracks) to the portions that fall inside a longitude-latitude rectangle. It is a pure,
//! synchronous, in-memory transform over caller-supplied vertex arrays.
//!
//! # Architecture
//!
//! - **[`Bounds`]**: Validated longitude-latitude rectangle
//! - **[`clip_segment`]**: Liang-Barsky parametric clip of a single segment
//! - **[`clip_polygon`]**: Liang-Barsky clip of a closed ring with degenerate cleanup
//! - **[`PolylineCollection`]**: Flat vertex storage with per-polyline counts
//! - **[`subset`]**: Clips every edge of a collection and reassembles contiguous fragments
//! - **[`Subsetter`]**: Configured entry point choosing sequential or parallel execution
//!
//! All operations are generic over the float width through [`geo::CoordFloat`], so the
//! same code serves `f32` and `f64` datasets.
//!
//! # Performance Characteristics
//!
//! - **Subset**: O(V) for V input vertices, output at most 2×V vertices
//! - **Polygon clip**: O(N) for an N-vertex ring, output at most 2×N+2 vertices

mod bounds;
mod collection;
pub mod geometry;
mod polygon;
mod segment;
mod subsetter;

// Public API exports
pub use bounds::{Bounds, is_valid_bounds, is_valid_longitude_latitude};
pub use collection::{PolylineCollection, subset, subset_parallel};
pub use polygon::{clip_polygon, clip_polygons};
pub use segment::clip_segment;
pub use subsetter::{Config, SubsetInfo, Subsetter};

/// Error types for the clipping engine
///
/// Every variant is a contract violation by the caller. An empty clip result is not an
/// error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClipError {
    #[error(
        "Invalid bounds: longitude [{lon_min}, {lon_max}], latitude [{lat_min}, {lat_max}]"
    )]
    InvalidBounds {
        lon_min: f64,
        lon_max: f64,
        lat_min: f64,
        lat_max: f64,
    },

    #[error("Invalid resolution: {0} (must be finite and >= 0)")]
    InvalidResolution(f64),

    #[error("Polygon has {count} vertices, at least 3 are required")]
    TooFewVertices { count: usize },

    #[error("Polyline {index} has {count} vertices, at least 2 are required")]
    PolylineTooShort { index: usize, count: usize },

    #[error("Invalid coordinate: longitude {longitude}, latitude {latitude}")]
    InvalidCoordinate { longitude: f64, latitude: f64 },

    #[error("Vertex counts sum to {expected} but {actual} vertices were supplied")]
    CountMismatch { expected: usize, actual: usize },
}

pub type Result<T> = std::result::Result<T, ClipError>;
