//! PolylineCollection - Flat storage for polylines and the bounds + resolution subset
//!
//! A collection stores every vertex in one array and the number of vertices of each
//! polyline in a parallel array, preserving insertion order. Subsetting clips every
//! edge to a rectangle and stitches the surviving fragments back into polylines.

use crate::bounds::is_valid_longitude_latitude;
use crate::geometry::{is_finite_coord, to_f64, unique_points};
use crate::{Bounds, ClipError, Result, clip_segment};
use geo::{Coord, CoordFloat, LineString, MultiLineString};
use rayon::prelude::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An ordered sequence of polylines stored as flat vertices plus per-polyline counts
///
/// Invariant: `counts` sums to `vertices.len()`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawPolylineCollection<T>"))]
pub struct PolylineCollection<T: CoordFloat = f64> {
    /// Number of vertices in each polyline
    counts: Vec<usize>,
    /// Vertices of all polylines, back to back
    vertices: Vec<Coord<T>>,
}

/// Unchecked wire form, validated on deserialization
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RawPolylineCollection<T: CoordFloat> {
    counts: Vec<usize>,
    vertices: Vec<Coord<T>>,
}

#[cfg(feature = "serde")]
impl<T: CoordFloat> TryFrom<RawPolylineCollection<T>> for PolylineCollection<T> {
    type Error = ClipError;

    fn try_from(raw: RawPolylineCollection<T>) -> Result<Self> {
        Self::from_parts(raw.counts, raw.vertices)
    }
}

impl<T: CoordFloat> Default for PolylineCollection<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl<T: CoordFloat> PolylineCollection<T> {
    /// Create an empty collection
    pub fn new() -> Self {
        Self {
            counts: Vec::new(),
            vertices: Vec::new(),
        }
    }

    /// Create an empty collection with room for the given number of polylines and vertices
    pub fn with_capacity(polylines: usize, vertices: usize) -> Self {
        Self {
            counts: Vec::with_capacity(polylines),
            vertices: Vec::with_capacity(vertices),
        }
    }

    /// Create a collection from a count array and a flat vertex array
    ///
    /// # Returns
    /// The collection, or [`ClipError::CountMismatch`] if the counts do not cover the
    /// vertices exactly
    pub fn from_parts(counts: Vec<usize>, vertices: Vec<Coord<T>>) -> Result<Self> {
        let expected: usize = counts.iter().sum();
        if expected != vertices.len() {
            return Err(ClipError::CountMismatch {
                expected,
                actual: vertices.len(),
            });
        }

        Ok(Self { counts, vertices })
    }

    /// Build a collection from anything that yields vertex slices
    pub fn from_polylines<I, P>(polylines: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<[Coord<T>]>,
    {
        let mut collection = Self::new();
        for polyline in polylines {
            collection.push(polyline.as_ref());
        }
        collection
    }

    /// Append a polyline
    pub fn push(&mut self, polyline: &[Coord<T>]) {
        self.counts.push(polyline.len());
        self.vertices.extend_from_slice(polyline);
    }

    /// Number of polylines
    #[inline]
    pub fn polyline_count(&self) -> usize {
        self.counts.len()
    }

    /// Total number of vertices across all polylines
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Check if the collection holds no polylines
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Per-polyline vertex counts
    #[inline]
    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    /// All vertices, back to back
    #[inline]
    pub fn vertices(&self) -> &[Coord<T>] {
        &self.vertices
    }

    /// Get the vertices of one polyline
    ///
    /// Sums the preceding counts on every call, so this is O(index). Use
    /// [`Self::polylines`] to visit every polyline.
    pub fn polyline(&self, index: usize) -> Option<&[Coord<T>]> {
        let count = *self.counts.get(index)?;
        let start: usize = self.counts[..index].iter().sum();
        self.vertices.get(start..start + count)
    }

    /// Iterate over the polylines in insertion order
    pub fn polylines(&self) -> impl Iterator<Item = &[Coord<T>]> + '_ {
        let mut offset = 0;
        self.counts.iter().map(move |&count| {
            let polyline = &self.vertices[offset..offset + count];
            offset += count;
            polyline
        })
    }

    /// Split into the count array and the vertex array
    pub fn into_parts(self) -> (Vec<usize>, Vec<Coord<T>>) {
        (self.counts, self.vertices)
    }

    /// Convert to a [`geo::MultiLineString`]
    pub fn to_multi_line_string(&self) -> MultiLineString<T> {
        MultiLineString::new(
            self.polylines()
                .map(|polyline| LineString::from(polyline.to_vec()))
                .collect(),
        )
    }

    /// Start a new polyline with its first edge
    #[inline]
    fn start_polyline(&mut self, start: Coord<T>, end: Coord<T>) {
        self.counts.push(2);
        self.vertices.push(start);
        self.vertices.push(end);
    }

    /// Extend the last polyline by one vertex
    #[inline]
    fn extend_last(&mut self, end: Coord<T>) {
        if let Some(count) = self.counts.last_mut() {
            *count += 1;
            self.vertices.push(end);
        }
    }

    /// Append another collection, joining its first polyline onto our last one when it
    /// starts exactly where ours ends
    fn append_contiguous(&mut self, other: PolylineCollection<T>) {
        let joins = match (self.vertices.last(), other.vertices.first()) {
            (Some(last), Some(first)) => last == first,
            _ => false,
        };

        let (counts, vertices) = other.into_parts();
        if joins {
            let first_count = counts[0];
            self.extend_last_by(first_count - 1);
            self.vertices.extend_from_slice(&vertices[1..]);
            self.counts.extend_from_slice(&counts[1..]);
        } else {
            self.vertices.extend(vertices);
            self.counts.extend(counts);
        }
    }

    #[inline]
    fn extend_last_by(&mut self, additional: usize) {
        if let Some(count) = self.counts.last_mut() {
            *count += additional;
        }
    }
}

impl<T: CoordFloat> From<MultiLineString<T>> for PolylineCollection<T> {
    fn from(lines: MultiLineString<T>) -> Self {
        Self::from_polylines(lines.0.iter().map(|line| line.0.as_slice()))
    }
}

impl<T: CoordFloat> From<&PolylineCollection<T>> for MultiLineString<T> {
    fn from(collection: &PolylineCollection<T>) -> Self {
        collection.to_multi_line_string()
    }
}

/// Writes clipped edges into an output collection, tracking contiguity
///
/// A clipped edge that starts exactly at the last written vertex extends the current
/// polyline by its end point; any other edge starts a new polyline.
struct Reassembler<T: CoordFloat> {
    output: PolylineCollection<T>,
    /// Last vertex written to `output`, if any
    last_written: Option<Coord<T>>,
    /// Number of times a new polyline had to be started after the first
    discontinuities: usize,
}

impl<T: CoordFloat> Reassembler<T> {
    fn new(polylines: usize, vertices: usize) -> Self {
        Self {
            output: PolylineCollection::with_capacity(polylines, vertices),
            last_written: None,
            discontinuities: 0,
        }
    }

    /// Clip every edge of the given polylines and write the kept parts
    fn run<'a, I>(&mut self, bounds: &Bounds<T>, resolution: T, polylines: I)
    where
        I: IntoIterator<Item = &'a [Coord<T>]>,
        T: 'a,
    {
        let filter = resolution > T::zero();

        for polyline in polylines {
            for edge in polyline.windows(2) {
                let (p1, p2) = (edge[0], edge[1]);

                // Cheap near-duplicate test before the clip
                if filter && !unique_points(p1, p2, resolution) {
                    continue;
                }

                if let Some((start, end)) = clip_segment(bounds, p1, p2) {
                    self.write(start, end);
                }
            }
        }
    }

    #[inline]
    fn write(&mut self, start: Coord<T>, end: Coord<T>) {
        match self.last_written {
            Some(last) if last == start => self.output.extend_last(end),
            previous => {
                if previous.is_some() {
                    self.discontinuities += 1;
                }
                self.output.start_polyline(start, end);
            }
        }
        self.last_written = Some(end);
    }

    fn finish(self) -> PolylineCollection<T> {
        debug_assert!(
            self.output.is_empty() || self.output.polyline_count() == self.discontinuities + 1
        );
        self.output
    }
}

/// Check the preconditions shared by both subset entry points
fn validate_subset_input<T: CoordFloat>(
    resolution: T,
    polylines: &PolylineCollection<T>,
) -> Result<()> {
    if !(resolution >= T::zero()) || !resolution.is_finite() {
        return Err(ClipError::InvalidResolution(to_f64(resolution)));
    }

    if let Some((index, &count)) = polylines
        .counts()
        .iter()
        .enumerate()
        .find(|&(_, &count)| count < 2)
    {
        return Err(ClipError::PolylineTooShort { index, count });
    }

    if let Some(first) = polylines.vertices().first() {
        if !is_valid_longitude_latitude(first.x, first.y) {
            return Err(ClipError::InvalidCoordinate {
                longitude: to_f64(first.x),
                latitude: to_f64(first.y),
            });
        }
    }

    // NaN would pass every boundary test and leak into the output
    if let Some(vertex) = polylines.vertices().iter().find(|&&v| !is_finite_coord(v)) {
        return Err(ClipError::InvalidCoordinate {
            longitude: to_f64(vertex.x),
            latitude: to_f64(vertex.y),
        });
    }

    Ok(())
}

/// Subset a polyline collection to `bounds`, optionally thinning by `resolution`
///
/// Every edge is clipped with [`clip_segment`]. With `resolution > 0`, edges whose end
/// points are within `resolution` of each other on both axes are skipped first. Kept
/// fragments that continue exactly where the previous one ended are merged, also
/// across input polylines; every other fragment starts a new output polyline.
///
/// # Returns
/// The subset (possibly empty, which is not an error). Its polyline count is one more
/// than the number of discontinuities seen, or zero when nothing was kept. All vertices
/// lie inside `bounds`.
pub fn subset<T: CoordFloat>(
    bounds: &Bounds<T>,
    resolution: T,
    polylines: &PolylineCollection<T>,
) -> Result<PolylineCollection<T>> {
    #[cfg(feature = "profiling")]
    profiling::scope!("collection::subset");
    debug_assert!(bounds.is_valid());
    validate_subset_input(resolution, polylines)?;

    let mut reassembler =
        Reassembler::new(polylines.polyline_count(), 2 * polylines.vertex_count());
    reassembler.run(bounds, resolution, polylines.polylines());

    tracing::debug!(
        "Subset {} polylines ({} vertices) to {} polylines ({} vertices), {} discontinuities",
        polylines.polyline_count(),
        polylines.vertex_count(),
        reassembler.output.polyline_count(),
        reassembler.output.vertex_count(),
        reassembler.discontinuities
    );

    let output = reassembler.finish();
    debug_assert!(output.vertices().iter().all(|&v| bounds.contains(v)));
    Ok(output)
}

/// Parallel version of [`subset`]
///
/// The input polylines are split into `chunks` contiguous groups that are subset on the
/// rayon thread pool. Group outputs are concatenated in input order, and a fragment
/// that starts where the previous group's output ended is joined onto it, so the result
/// is identical to [`subset`].
pub fn subset_parallel<T: CoordFloat + Send + Sync>(
    bounds: &Bounds<T>,
    resolution: T,
    polylines: &PolylineCollection<T>,
    chunks: usize,
) -> Result<PolylineCollection<T>> {
    #[cfg(feature = "profiling")]
    profiling::scope!("collection::subset_parallel");
    debug_assert!(bounds.is_valid());
    validate_subset_input(resolution, polylines)?;

    let slices: Vec<&[Coord<T>]> = polylines.polylines().collect();
    let chunk_len = slices.len().div_ceil(chunks.max(1)).max(1);

    let partials: Vec<PolylineCollection<T>> = slices
        .par_chunks(chunk_len)
        .map(|group| {
            let vertices: usize = group.iter().map(|polyline| polyline.len()).sum();
            let mut reassembler = Reassembler::new(group.len(), 2 * vertices);
            reassembler.run(bounds, resolution, group.iter().copied());
            tracing::trace!(
                "Chunk of {} polylines produced {} polylines",
                group.len(),
                reassembler.output.polyline_count()
            );
            reassembler.finish()
        })
        .collect();

    let mut output =
        PolylineCollection::with_capacity(polylines.polyline_count(), 2 * polylines.vertex_count());
    for partial in partials {
        output.append_contiguous(partial);
    }

    tracing::debug!(
        "Parallel subset of {} polylines in {} chunks produced {} polylines ({} vertices)",
        polylines.polyline_count(),
        slices.len().div_ceil(chunk_len),
        output.polyline_count(),
        output.vertex_count()
    );

    debug_assert!(output.vertices().iter().all(|&v| bounds.contains(v)));
    Ok(output)
}
