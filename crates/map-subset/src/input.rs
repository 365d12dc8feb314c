//! Reading polylines from GPX and JSON files, and writing subset results
//!
//! JSON files use a nested-array layout, one `[lon, lat]` pair per vertex:
//! `{"polylines": [[[lon, lat], ...], ...]}`. The output adds the clip bounds, as
//! `[[lon_min, lon_max], [lat_min, lat_max]]`, and the totals.

use crate::CliError;
use geo::Coord;
use map_subset_lib::{Bounds, PolylineCollection};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;

/// Polylines as stored in a JSON input file
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct PolylineFile {
    pub polylines: Vec<Vec<[f64; 2]>>,
}

/// JSON document written after a run
#[derive(Debug, Serialize, Deserialize)]
pub struct SubsetOutput {
    pub bounds: Bounds<f64>,
    pub polylines: Vec<Vec<[f64; 2]>>,
    pub polyline_count: usize,
    pub vertex_count: usize,
}

impl SubsetOutput {
    /// Summarize a result collection clipped to `bounds`
    pub fn new(bounds: Bounds<f64>, collection: &PolylineCollection<f64>) -> Self {
        Self {
            bounds,
            polylines: collection
                .polylines()
                .map(|polyline| polyline.iter().map(|c| [c.x, c.y]).collect())
                .collect(),
            polyline_count: collection.polyline_count(),
            vertex_count: collection.vertex_count(),
        }
    }
}

/// Load every input file into one collection, in argument order
pub fn load_files<P: AsRef<Path>>(paths: &[P]) -> Result<PolylineCollection<f64>, CliError> {
    #[cfg(feature = "profiling")]
    profiling::scope!("input::load_files");

    let mut collection = PolylineCollection::new();
    for path in paths {
        let path = path.as_ref();
        let before = collection.polyline_count();
        let read = match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("gpx") => read_gpx::<BufReader<File>>,
            Some(ext) if ext.eq_ignore_ascii_case("json") => read_json::<BufReader<File>>,
            _ => return Err(CliError::UnsupportedInput(path.to_path_buf())),
        };

        let reader = BufReader::new(File::open(path)?);
        read(reader, &mut collection)?;

        tracing::info!(
            "Loaded {} polylines from {}",
            collection.polyline_count() - before,
            path.display()
        );
    }
    Ok(collection)
}

/// Append every track segment of a GPX document as one polyline
///
/// Segments with fewer than two points have no edges and are skipped.
pub fn read_gpx<R: Read>(
    reader: R,
    collection: &mut PolylineCollection<f64>,
) -> Result<(), CliError> {
    let gpx = gpx::read(reader)?;

    let mut polyline = Vec::new();
    for segment in gpx.tracks.iter().flat_map(|track| track.segments.iter()) {
        if segment.points.len() < 2 {
            tracing::debug!("Skipping track segment with {} points", segment.points.len());
            continue;
        }
        polyline.clear();
        polyline.extend(segment.points.iter().map(|waypoint| {
            let point = waypoint.point();
            Coord {
                x: point.x(),
                y: point.y(),
            }
        }));
        collection.push(&polyline);
    }
    Ok(())
}

/// Append the polylines of a JSON polyline file
pub fn read_json<R: Read>(
    reader: R,
    collection: &mut PolylineCollection<f64>,
) -> Result<(), CliError> {
    let file: PolylineFile = serde_json::from_reader(reader)?;

    let mut polyline = Vec::new();
    for vertices in &file.polylines {
        polyline.clear();
        polyline.extend(vertices.iter().map(|&[x, y]| Coord { x, y }));
        collection.push(&polyline);
    }
    Ok(())
}

/// Serialize a result collection as JSON
pub fn write_output<W: Write>(
    writer: W,
    bounds: Bounds<f64>,
    collection: &PolylineCollection<f64>,
    pretty: bool,
) -> Result<(), CliError> {
    let output = SubsetOutput::new(bounds, collection);
    if pretty {
        serde_json::to_writer_pretty(writer, &output)?;
    } else {
        serde_json::to_writer(writer, &output)?;
    }
    Ok(())
}
