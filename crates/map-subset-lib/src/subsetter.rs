//! Subsetter - Configured entry point for clipping whole collections
//!
//! Bundles the tunables of a subsetting run and decides whether the work is large enough
//! to be spread over the rayon thread pool.

use crate::geometry::cast;
use crate::{Bounds, PolylineCollection, Result, clip_polygons, subset, subset_parallel};
use geo::CoordFloat;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for a subsetting run
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Config {
    /// Minimum per-axis separation between consecutive vertices, in degrees.
    /// Edges shorter than this on both axes are dropped. 0.0 disables thinning.
    pub resolution: f64,
    /// Remove repeated vertices and zero-area artifacts from clipped polygons
    pub discard_degenerates: bool,
    /// Minimum number of input polylines before work is split across threads.
    /// 0 keeps every run sequential.
    pub parallel_threshold: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            resolution: 0.0,
            discard_degenerates: true,
            parallel_threshold: 1024,
        }
    }
}

/// Size of a collection before and after a run
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SubsetInfo {
    /// Number of input polylines or rings
    pub input_polylines: usize,
    /// Total number of input vertices
    pub input_vertices: usize,
    /// Number of output polylines or rings
    pub output_polylines: usize,
    /// Total number of output vertices
    pub output_vertices: usize,
}

impl SubsetInfo {
    /// Compare an input collection with its output
    pub fn new<T: CoordFloat>(
        input: &PolylineCollection<T>,
        output: &PolylineCollection<T>,
    ) -> Self {
        Self {
            input_polylines: input.polyline_count(),
            input_vertices: input.vertex_count(),
            output_polylines: output.polyline_count(),
            output_vertices: output.vertex_count(),
        }
    }
}

/// Top-level entry point for subsetting collections with a fixed configuration
#[derive(Debug, Clone, Default)]
pub struct Subsetter {
    config: Config,
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl Subsetter {
    /// Create a subsetter with the given configuration
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Get a reference to the configuration
    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Subset open polylines to `bounds`
    ///
    /// Runs in parallel once the collection reaches `parallel_threshold` polylines; the
    /// output is the same either way.
    pub fn subset_polylines<T: CoordFloat + Send + Sync>(
        &self,
        bounds: &Bounds<T>,
        polylines: &PolylineCollection<T>,
    ) -> Result<PolylineCollection<T>> {
        #[cfg(feature = "profiling")]
        profiling::scope!("subsetter::subset_polylines");

        let resolution: T = cast(self.config.resolution);
        let threshold = self.config.parallel_threshold;

        if threshold > 0 && polylines.polyline_count() >= threshold {
            let chunks = rayon::current_num_threads();
            tracing::debug!(
                "Subsetting {} polylines on {} threads",
                polylines.polyline_count(),
                chunks
            );
            subset_parallel(bounds, resolution, polylines, chunks)
        } else {
            subset(bounds, resolution, polylines)
        }
    }

    /// Clip closed polygon rings to `bounds`
    pub fn clip_polygons<T: CoordFloat + Send + Sync>(
        &self,
        bounds: &Bounds<T>,
        polygons: &PolylineCollection<T>,
    ) -> Result<PolylineCollection<T>> {
        clip_polygons(bounds, polygons, self.config.discard_degenerates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ClipError;
    use geo::Coord;

    fn c(x: f64, y: f64) -> Coord<f64> {
        Coord { x, y }
    }

    /// Many short polylines spread over a band that crosses the bounds
    fn create_test_collection(count: usize) -> PolylineCollection<f64> {
        PolylineCollection::from_polylines((0..count).map(|i| {
            let y = -5.0 + (i % 100) as f64 * 0.1;
            let x = -30.0 + (i / 100) as f64 * 3.0;
            vec![c(x, y), c(x + 2.0, y + 0.05), c(x + 4.0, y)]
        }))
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.resolution, 0.0);
        assert!(config.discard_degenerates);
        assert_eq!(config.parallel_threshold, 1024);
    }

    #[test]
    fn test_parallel_and_sequential_agree() {
        let bounds = Bounds::new(-10.0, -2.0, 10.0, 2.0).unwrap();
        let input = create_test_collection(2000);

        let sequential = Subsetter::new(Config {
            parallel_threshold: 0,
            ..Config::default()
        });
        let parallel = Subsetter::new(Config {
            parallel_threshold: 10,
            ..Config::default()
        });

        let a = sequential.subset_polylines(&bounds, &input).unwrap();
        let b = parallel.subset_polylines(&bounds, &input).unwrap();
        assert!(!a.is_empty());
        assert_eq!(a, b);
    }

    #[test]
    fn test_resolution_from_config() {
        let bounds = Bounds::new(-10.0, -10.0, 10.0, 10.0).unwrap();
        let input = PolylineCollection::from_polylines([vec![
            c(0.0, 0.0),
            c(0.0001, 0.0),
            c(0.0002, 0.0),
        ]]);

        let subsetter = Subsetter::new(Config {
            resolution: 0.001,
            ..Config::default()
        });
        let output = subsetter.subset_polylines(&bounds, &input).unwrap();
        assert!(output.vertex_count() < input.vertex_count());

        let invalid = Subsetter::new(Config {
            resolution: -0.5,
            ..Config::default()
        });
        assert_eq!(
            invalid.subset_polylines(&bounds, &input),
            Err(ClipError::InvalidResolution(-0.5))
        );
    }

    #[test]
    fn test_clip_polygons_uses_degenerate_setting() {
        let bounds = Bounds::new(0.0, 0.0, 10.0, 10.0).unwrap();
        let polygons =
            PolylineCollection::from_polylines([vec![c(5.0, 5.0), c(15.0, 5.0), c(5.0, 15.0)]]);

        let cleaned = Subsetter::default().clip_polygons(&bounds, &polygons).unwrap();
        assert_eq!(cleaned.counts(), &[4]);

        let raw = Subsetter::new(Config {
            discard_degenerates: false,
            ..Config::default()
        })
        .clip_polygons(&bounds, &polygons)
        .unwrap();
        assert_eq!(raw.counts(), &[5]);
    }

    #[test]
    fn test_subset_info() {
        let input = create_test_collection(10);
        let output = PolylineCollection::from_polylines([vec![c(0.0, 0.0), c(1.0, 1.0)]]);

        let info = SubsetInfo::new(&input, &output);
        assert_eq!(info.input_polylines, 10);
        assert_eq!(info.input_vertices, 30);
        assert_eq!(info.output_polylines, 1);
        assert_eq!(info.output_vertices, 2);
    }
}
