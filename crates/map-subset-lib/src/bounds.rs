//! Longitude-latitude bounding rectangles
//!
//! [`Bounds`] can only be constructed through validation, so every clip operation that
//! receives one can rely on the axis invariants without re-checking them.

use crate::geometry::{LATITUDE_MAX, LATITUDE_MIN, LONGITUDE_MAX, LONGITUDE_MIN, cast, to_f64};
use crate::{ClipError, Result};
use geo::{Coord, CoordFloat, Rect};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in longitude-latitude space
///
/// Invariant: `lon_min <= lon_max` within `[-180, 180]` and `lat_min <= lat_max` within
/// `[-90, 90]`. Degenerate (zero-width or zero-height) rectangles are valid.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(try_from = "[[T; 2]; 2]", into = "[[T; 2]; 2]")
)]
pub struct Bounds<T: CoordFloat = f64> {
    lon_min: T,
    lon_max: T,
    lat_min: T,
    lat_max: T,
}

/// Check that a raw `[[lon_min, lon_max], [lat_min, lat_max]]` rectangle is well formed
pub fn is_valid_bounds<T: CoordFloat>(bounds: &[[T; 2]; 2]) -> bool {
    let [[lon_min, lon_max], [lat_min, lat_max]] = *bounds;
    is_valid_range(lon_min, lon_max, LONGITUDE_MIN, LONGITUDE_MAX)
        && is_valid_range(lat_min, lat_max, LATITUDE_MIN, LATITUDE_MAX)
}

/// Check that a single point lies on the globe (`[-180, 180] × [-90, 90]`)
#[inline]
pub fn is_valid_longitude_latitude<T: CoordFloat>(longitude: T, latitude: T) -> bool {
    longitude >= cast::<T>(LONGITUDE_MIN)
        && longitude <= cast::<T>(LONGITUDE_MAX)
        && latitude >= cast::<T>(LATITUDE_MIN)
        && latitude <= cast::<T>(LATITUDE_MAX)
}

#[inline]
fn is_valid_range<T: CoordFloat>(minimum: T, maximum: T, lower: f64, upper: f64) -> bool {
    // Written so that NaN fails every comparison
    minimum >= cast::<T>(lower) && minimum <= maximum && maximum <= cast::<T>(upper)
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl<T: CoordFloat> Bounds<T> {
    /// Create validated bounds
    ///
    /// # Returns
    /// The rectangle, or [`ClipError::InvalidBounds`] if an axis is reversed, out of
    /// range or NaN
    pub fn new(lon_min: T, lat_min: T, lon_max: T, lat_max: T) -> Result<Self> {
        let bounds = Self {
            lon_min,
            lon_max,
            lat_min,
            lat_max,
        };

        if !bounds.is_valid() {
            return Err(ClipError::InvalidBounds {
                lon_min: to_f64(lon_min),
                lon_max: to_f64(lon_max),
                lat_min: to_f64(lat_min),
                lat_max: to_f64(lat_max),
            });
        }

        Ok(bounds)
    }

    /// Create bounds from the `[[lon_min, lon_max], [lat_min, lat_max]]` layout
    pub fn from_array(bounds: [[T; 2]; 2]) -> Result<Self> {
        let [[lon_min, lon_max], [lat_min, lat_max]] = bounds;
        Self::new(lon_min, lat_min, lon_max, lat_max)
    }

    /// The whole globe
    pub fn globe() -> Self {
        Self {
            lon_min: cast(LONGITUDE_MIN),
            lon_max: cast(LONGITUDE_MAX),
            lat_min: cast(LATITUDE_MIN),
            lat_max: cast(LATITUDE_MAX),
        }
    }

    /// Tight bounds around a set of coordinates
    ///
    /// Fails with [`ClipError::InvalidBounds`] when the set is empty or a coordinate lies
    /// off the globe.
    pub fn from_coords<I>(coords: I) -> Result<Self>
    where
        I: IntoIterator<Item = Coord<T>>,
    {
        let mut lon_min = T::infinity();
        let mut lat_min = T::infinity();
        let mut lon_max = T::neg_infinity();
        let mut lat_max = T::neg_infinity();

        for coord in coords {
            lon_min = lon_min.min(coord.x);
            lat_min = lat_min.min(coord.y);
            lon_max = lon_max.max(coord.x);
            lat_max = lat_max.max(coord.y);
        }

        Self::new(lon_min, lat_min, lon_max, lat_max)
    }

    /// Re-check the axis invariants
    #[inline]
    pub fn is_valid(&self) -> bool {
        is_valid_bounds(&self.to_array())
    }

    #[inline]
    pub fn lon_min(&self) -> T {
        self.lon_min
    }

    #[inline]
    pub fn lon_max(&self) -> T {
        self.lon_max
    }

    #[inline]
    pub fn lat_min(&self) -> T {
        self.lat_min
    }

    #[inline]
    pub fn lat_max(&self) -> T {
        self.lat_max
    }

    /// South-west corner
    #[inline]
    pub fn min(&self) -> Coord<T> {
        Coord {
            x: self.lon_min,
            y: self.lat_min,
        }
    }

    /// North-east corner
    #[inline]
    pub fn max(&self) -> Coord<T> {
        Coord {
            x: self.lon_max,
            y: self.lat_max,
        }
    }

    /// The `[[lon_min, lon_max], [lat_min, lat_max]]` layout
    #[inline]
    pub fn to_array(&self) -> [[T; 2]; 2] {
        [[self.lon_min, self.lon_max], [self.lat_min, self.lat_max]]
    }

    /// Check if a coordinate lies inside the closed rectangle
    #[inline(always)]
    pub fn contains(&self, coord: Coord<T>) -> bool {
        coord.x >= self.lon_min
            && coord.x <= self.lon_max
            && coord.y >= self.lat_min
            && coord.y <= self.lat_max
    }

    /// Check if two rectangles share at least one point
    #[inline]
    pub fn overlaps(&self, other: &Bounds<T>) -> bool {
        !(self.lon_max < other.lon_min
            || self.lon_min > other.lon_max
            || self.lat_max < other.lat_min
            || self.lat_min > other.lat_max)
    }

    /// Move a coordinate onto the nearest point of the rectangle
    #[inline(always)]
    pub fn clamp(&self, coord: Coord<T>) -> Coord<T> {
        Coord {
            x: coord.x.max(self.lon_min).min(self.lon_max),
            y: coord.y.max(self.lat_min).min(self.lat_max),
        }
    }

    /// Convert to a [`geo::Rect`]
    #[inline]
    pub fn to_rect(&self) -> Rect<T> {
        Rect::new(self.min(), self.max())
    }
}

impl<T: CoordFloat> From<Bounds<T>> for Rect<T> {
    fn from(bounds: Bounds<T>) -> Self {
        bounds.to_rect()
    }
}

impl<T: CoordFloat> From<Bounds<T>> for [[T; 2]; 2] {
    fn from(bounds: Bounds<T>) -> Self {
        bounds.to_array()
    }
}

impl<T: CoordFloat> TryFrom<Rect<T>> for Bounds<T> {
    type Error = ClipError;

    fn try_from(rect: Rect<T>) -> Result<Self> {
        Self::new(rect.min().x, rect.min().y, rect.max().x, rect.max().y)
    }
}

impl<T: CoordFloat> TryFrom<[[T; 2]; 2]> for Bounds<T> {
    type Error = ClipError;

    fn try_from(bounds: [[T; 2]; 2]) -> Result<Self> {
        Self::from_array(bounds)
    }
}
