//! Geometric primitives shared by the segment and polygon clippers

use geo::{Coord, CoordFloat};

/// Smallest valid longitude in degrees
pub const LONGITUDE_MIN: f64 = -180.0;
/// Largest valid longitude in degrees
pub const LONGITUDE_MAX: f64 = 180.0;
/// Smallest valid latitude in degrees
pub const LATITUDE_MIN: f64 = -90.0;
/// Largest valid latitude in degrees
pub const LATITUDE_MAX: f64 = 90.0;

/// Convert an `f64` constant into the working float type.
///
/// Falls back to NaN, which fails every range comparison it takes part in.
#[inline(always)]
pub(crate) fn cast<T: CoordFloat>(value: f64) -> T {
    T::from(value).unwrap_or_else(T::nan)
}

/// Convert a working float back to `f64` for error reporting
#[inline(always)]
pub(crate) fn to_f64<T: CoordFloat>(value: T) -> f64 {
    value.to_f64().unwrap_or(f64::NAN)
}

/// Check that both coordinates are finite (neither NaN nor infinite)
#[inline(always)]
pub(crate) fn is_finite_coord<T: CoordFloat>(coord: Coord<T>) -> bool {
    coord.x.is_finite() && coord.y.is_finite()
}

/// Area of the triangle `a`, `b`, `c` (half the absolute cross product)
///
/// # Returns
/// A non-negative area in squared coordinate units; zero when the points are collinear
#[inline]
pub fn area_of_triangle<T: CoordFloat>(a: Coord<T>, b: Coord<T>, c: Coord<T>) -> T {
    let cross = (b.x - a.x) * (c.y - a.y) - (c.x - a.x) * (b.y - a.y);
    cross.abs() * cast::<T>(0.5)
}

/// Check whether three points lie on one line (zero triangle area)
#[inline]
pub fn is_collinear<T: CoordFloat>(a: Coord<T>, b: Coord<T>, c: Coord<T>) -> bool {
    area_of_triangle(a, b, c) == T::zero()
}

/// Check whether two points are farther apart than `resolution` on either axis
///
/// This is a cheap per-axis test, not a Euclidean distance.
#[inline]
pub fn unique_points<T: CoordFloat>(p1: Coord<T>, p2: Coord<T>, resolution: T) -> bool {
    (p1.x - p2.x).abs() > resolution || (p1.y - p2.y).abs() > resolution
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_area_of_triangle() {
        let a = Coord { x: 0.0, y: 0.0 };
        let b = Coord { x: 4.0, y: 0.0 };
        let c = Coord { x: 0.0, y: 3.0 };
        assert_eq!(area_of_triangle(a, b, c), 6.0);
        // Orientation does not change the area
        assert_eq!(area_of_triangle(a, c, b), 6.0);
    }

    #[test]
    fn test_is_collinear() {
        let a = Coord { x: 1.0, y: 1.0 };
        let b = Coord { x: 2.0, y: 2.0 };
        let c = Coord { x: 5.0, y: 5.0 };
        assert!(is_collinear(a, b, c));
        assert!(is_collinear(a, a, c));
        assert!(!is_collinear(a, b, Coord { x: 5.0, y: 4.0 }));
    }

    #[test]
    fn test_unique_points() {
        let p1 = Coord { x: 10.0, y: 20.0 };
        let p2 = Coord {
            x: 10.0005,
            y: 20.0,
        };
        assert!(!unique_points(p1, p2, 0.001));
        assert!(unique_points(p1, p2, 0.0001));

        // Either axis is enough
        let p3 = Coord { x: 10.0, y: 20.01 };
        assert!(unique_points(p1, p3, 0.001));
    }

    #[test]
    fn test_unique_points_f32() {
        let p1 = Coord { x: 1.0f32, y: 1.0 };
        let p2 = Coord { x: 1.5f32, y: 1.0 };
        assert!(unique_points(p1, p2, 0.25));
        assert!(!unique_points(p1, p2, 0.5));
    }

    #[test]
    fn test_cast_roundtrip() {
        let value: f32 = cast(LATITUDE_MAX);
        assert_eq!(value, 90.0f32);
        assert_eq!(to_f64(value), 90.0);
    }
}
