//! Liang-Barsky clipping of closed polygons
//!
//! Each edge of the ring is clipped independently. Where an edge passes through one of
//! the corner regions outside the rectangle, the matching rectangle corner is emitted so
//! that the clipped ring follows the boundary instead of cutting across it.

use crate::geometry::{is_collinear, is_finite_coord, to_f64};
use crate::{Bounds, ClipError, PolylineCollection, Result};
use geo::{Coord, CoordFloat};
use rayon::prelude::*;

/// Clip a closed polygon ring to `bounds`
///
/// The ring is implicitly closed: the last vertex connects back to the first, and the
/// first vertex must not be repeated at the end.
///
/// # Arguments
/// * `bounds` - The clip rectangle
/// * `vertices` - Ring vertices, at least 3
/// * `discard_degenerates` - Collapse repeated vertices and remove zero-area artifacts
///
/// # Returns
/// The clipped ring (empty, or at least 3 vertices). A ring lying wholly inside
/// `bounds` is returned unchanged. For a simple (non self-intersecting) ring of N
/// vertices the result has at most 2N+2 vertices; a self-intersecting ring can sweep
/// past more corners and exceed that. Non-finite vertices are rejected with
/// [`ClipError::InvalidCoordinate`].
pub fn clip_polygon<T: CoordFloat>(
    bounds: &Bounds<T>,
    vertices: &[Coord<T>],
    discard_degenerates: bool,
) -> Result<Vec<Coord<T>>> {
    debug_assert!(bounds.is_valid());

    let count = vertices.len();
    if count < 3 {
        return Err(ClipError::TooFewVertices { count });
    }
    if let Some(vertex) = vertices.iter().find(|&&v| !is_finite_coord(v)) {
        return Err(ClipError::InvalidCoordinate {
            longitude: to_f64(vertex.x),
            latitude: to_f64(vertex.y),
        });
    }

    let mut ring = RingBuilder::new(bounds, 2 * count + 2, discard_degenerates);

    // Start with the closing edge so the first output vertex is the first input vertex
    let mut previous = vertices[count - 1];
    for &current in vertices {
        clip_edge(bounds, previous, current, &mut ring);
        previous = current;
    }

    let points = ring.finish();
    debug_assert!(points.is_empty() || points.len() >= 3);
    debug_assert!(points.iter().all(|&p| bounds.contains(p)));
    Ok(points)
}

/// Clip every ring of a polygon collection to `bounds`
///
/// Rings are clipped in parallel. Rings that vanish are dropped; the survivors keep
/// their input order.
pub fn clip_polygons<T: CoordFloat + Send + Sync>(
    bounds: &Bounds<T>,
    polygons: &PolylineCollection<T>,
    discard_degenerates: bool,
) -> Result<PolylineCollection<T>> {
    #[cfg(feature = "profiling")]
    profiling::scope!("polygon::clip_polygons");

    // Validate everything up front so no partial output is produced
    if let Some(&count) = polygons.counts().iter().find(|&&count| count < 3) {
        return Err(ClipError::TooFewVertices { count });
    }

    let rings: Vec<&[Coord<T>]> = polygons.polylines().collect();
    let clipped: Vec<Vec<Coord<T>>> = rings
        .par_iter()
        .map(|ring| clip_polygon(bounds, ring, discard_degenerates))
        .collect::<Result<_>>()?;

    let vertex_count = clipped.iter().map(Vec::len).sum();
    let mut output = PolylineCollection::with_capacity(clipped.len(), vertex_count);
    for ring in clipped.iter().filter(|ring| !ring.is_empty()) {
        output.push(ring);
    }

    tracing::debug!(
        "Clipped {} polygons ({} vertices) to {} polygons ({} vertices)",
        polygons.polyline_count(),
        polygons.vertex_count(),
        output.polyline_count(),
        output.vertex_count()
    );

    Ok(output)
}

/// Accumulates the vertices emitted while walking the ring's edges
struct RingBuilder<'a, T: CoordFloat> {
    bounds: &'a Bounds<T>,
    points: Vec<Coord<T>>,
    discard_degenerates: bool,
    /// Set once a vertex that is not an input vertex has been emitted
    clipped: bool,
}

impl<'a, T: CoordFloat> RingBuilder<'a, T> {
    fn new(bounds: &'a Bounds<T>, capacity: usize, discard_degenerates: bool) -> Self {
        Self {
            bounds,
            points: Vec::with_capacity(capacity),
            discard_degenerates,
            clipped: false,
        }
    }

    #[inline(always)]
    fn push(&mut self, point: Coord<T>) {
        // Interpolated points may land a rounding error outside the rectangle
        let point = self.bounds.clamp(point);
        if self.discard_degenerates && self.points.last() == Some(&point) {
            return;
        }
        self.points.push(point);
    }

    /// Push a vertex computed on the boundary of the rectangle while clipping the edge
    /// `from`-`to`
    #[inline(always)]
    fn push_boundary(&mut self, point: Coord<T>, from: Coord<T>, to: Coord<T>) {
        let point = self.bounds.clamp(point);
        if point != from && point != to {
            self.clipped = true;
        }
        self.push(point);
    }

    fn finish(mut self) -> Vec<Coord<T>> {
        if self.discard_degenerates {
            while self.points.len() > 1 && self.points.first() == self.points.last() {
                self.points.pop();
            }
            // Only per-edge clipping produces the hat, an untouched ring keeps its shape
            if self.clipped {
                remove_collinear_tail(&mut self.points);
            }
        }

        if self.points.len() < 3 {
            self.points.clear();
        }

        self.points
    }
}

/// Remove the zero-area "hat" that per-edge clipping leaves on a 5-vertex result
///
/// If the last three vertices are collinear the last two are dropped, and the
/// triangle left behind is dropped too when it has zero area.
fn remove_collinear_tail<T: CoordFloat>(points: &mut Vec<Coord<T>>) {
    if points.len() == 5 && is_collinear(points[2], points[3], points[4]) {
        points.truncate(3);
        if is_collinear(points[0], points[1], points[2]) {
            points.clear();
        }
    }
}

/// Entry and exit boundaries along one axis
///
/// A zero direction component is resolved against the far (maximum) boundary.
#[inline(always)]
fn entry_exit<T: CoordFloat>(delta: T, value: T, minimum: T, maximum: T) -> (T, T) {
    if delta > T::zero() || (delta == T::zero() && value > maximum) {
        (minimum, maximum)
    } else {
        (maximum, minimum)
    }
}

/// Parameter at which the edge leaves the strip along one axis
///
/// Axis-parallel edges never leave a strip they are inside (`+∞`) and are never inside
/// one they are outside (`-∞`).
#[inline(always)]
fn exit_parameter<T: CoordFloat>(delta: T, value: T, exit: T, minimum: T, maximum: T) -> T {
    if delta != T::zero() {
        (exit - value) / delta
    } else if minimum <= value && value <= maximum {
        T::infinity()
    } else {
        T::neg_infinity()
    }
}

/// Parameter at which the edge enters the strip along one axis
#[inline(always)]
fn entry_parameter<T: CoordFloat>(delta: T, value: T, entry: T) -> T {
    if delta != T::zero() {
        (entry - value) / delta
    } else {
        T::neg_infinity()
    }
}

/// Emit the 0 to 3 vertices contributed by the edge `from`-`to`
fn clip_edge<T: CoordFloat>(
    bounds: &Bounds<T>,
    from: Coord<T>,
    to: Coord<T>,
    ring: &mut RingBuilder<'_, T>,
) {
    let zero = T::zero();
    let one = T::one();
    let delta = to - from;

    let (x_in, x_out) = entry_exit(delta.x, from.x, bounds.lon_min(), bounds.lon_max());
    let (y_in, y_out) = entry_exit(delta.y, from.y, bounds.lat_min(), bounds.lat_max());

    let t_out_x = exit_parameter(delta.x, from.x, x_out, bounds.lon_min(), bounds.lon_max());
    let t_out_y = exit_parameter(delta.y, from.y, y_out, bounds.lat_min(), bounds.lat_max());

    let (t_out1, t_out2) = if t_out_x < t_out_y {
        (t_out_x, t_out_y)
    } else {
        (t_out_y, t_out_x)
    };

    if t_out2 <= zero {
        return;
    }

    let t_in_x = entry_parameter(delta.x, from.x, x_in);
    let t_in_y = entry_parameter(delta.y, from.y, y_in);
    let t_in2 = t_in_x.max(t_in_y);

    if t_out1 < t_in2 {
        // No visible part; the edge only sweeps past a corner region
        if zero < t_out1 && t_out1 <= one {
            if t_in_x < t_in_y {
                ring.push_boundary(Coord { x: x_out, y: y_in }, from, to);
            } else {
                ring.push_boundary(Coord { x: x_in, y: y_out }, from, to);
            }
        }
    } else if zero < t_out1 && t_in2 <= one {
        if zero <= t_in2 {
            if t_in_x > t_in_y {
                let point = Coord {
                    x: x_in,
                    y: from.y + t_in_x * delta.y,
                };
                ring.push_boundary(point, from, to);
            } else {
                let point = Coord {
                    x: from.x + t_in_y * delta.x,
                    y: y_in,
                };
                ring.push_boundary(point, from, to);
            }
        }

        if t_out1 <= one {
            if t_out_x < t_out_y {
                let point = Coord {
                    x: x_out,
                    y: from.y + t_out_x * delta.y,
                };
                ring.push_boundary(point, from, to);
            } else {
                let point = Coord {
                    x: from.x + t_out_y * delta.x,
                    y: y_out,
                };
                ring.push_boundary(point, from, to);
            }
        } else {
            ring.push(to);
        }
    }

    if zero < t_out2 && t_out2 <= one {
        ring.push_boundary(Coord { x: x_out, y: y_out }, from, to);
    }
}
