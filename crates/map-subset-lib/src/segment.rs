//! Liang-Barsky clipping of a single line segment
//!
//! The segment is treated parametrically as `P(t) = p1 + t·(p2 - p1)` with `t ∈ [0, 1]`,
//! and the valid interval `[t1, t2]` is narrowed against each boundary of the rectangle.

use crate::Bounds;
use crate::geometry::is_finite_coord;
use geo::{Coord, CoordFloat};

/// Clip the segment `p1`-`p2` to `bounds`
///
/// # Returns
/// `None` if the segment misses the rectangle, otherwise the (possibly shortened)
/// segment with both endpoints inside `bounds`. Endpoints that are already inside are
/// returned bit-for-bit unchanged, which lets callers detect contiguous fragments by
/// exact comparison. A segment with a non-finite endpoint is rejected.
pub fn clip_segment<T: CoordFloat>(
    bounds: &Bounds<T>,
    p1: Coord<T>,
    p2: Coord<T>,
) -> Option<(Coord<T>, Coord<T>)> {
    debug_assert!(bounds.is_valid());

    if !is_finite_coord(p1) || !is_finite_coord(p2) {
        return None;
    }

    let delta = p2 - p1;
    let mut t1 = T::zero();
    let mut t2 = T::one();

    // Left, right, bottom, top
    let boundaries = [
        (-delta.x, p1.x - bounds.lon_min()),
        (delta.x, bounds.lon_max() - p1.x),
        (-delta.y, p1.y - bounds.lat_min()),
        (delta.y, bounds.lat_max() - p1.y),
    ];

    for (p, q) in boundaries {
        if !narrow_interval(p, q, &mut t1, &mut t2) {
            return None;
        }
    }

    // End point first: both are measured from the original start point
    let end = if t2 < T::one() {
        bounds.clamp(p1 + delta * t2)
    } else {
        p2
    };

    let start = if t1 > T::zero() {
        bounds.clamp(p1 + delta * t1)
    } else {
        p1
    };

    debug_assert!(bounds.contains(start) && bounds.contains(end));
    Some((start, end))
}

/// Narrow `[t1, t2]` against one boundary
///
/// `p` is the direction component along the boundary's outward normal and `q` the signed
/// distance of the start point from it (positive inside).
///
/// # Returns
/// `false` when the segment lies entirely outside this boundary
#[inline(always)]
fn narrow_interval<T: CoordFloat>(p: T, q: T, t1: &mut T, t2: &mut T) -> bool {
    if p < T::zero() {
        // Entering through this boundary
        let r = q / p;
        if r > *t2 {
            return false;
        }
        if r > *t1 {
            *t1 = r;
        }
    } else if p > T::zero() {
        // Leaving through this boundary
        let r = q / p;
        if r < *t1 {
            return false;
        }
        if r < *t2 {
            *t2 = r;
        }
    } else if q < T::zero() {
        // Parallel and outside
        return false;
    }

    true
}
