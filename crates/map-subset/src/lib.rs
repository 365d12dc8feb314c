//! Map Subset - Command line driver
//!
//! Loads GPX tracks and polyline JSON files, clips them to a bounding box with
//! `map-subset-lib`, and writes the result as JSON.

mod input;
mod logging;
mod settings;

pub use input::{PolylineFile, SubsetOutput, load_files, read_gpx, read_json, write_output};
pub use logging::setup_logging;
pub use settings::Settings;

use map_subset_lib::{PolylineCollection, SubsetInfo, Subsetter};
use std::io::Write;
use std::path::PathBuf;

/// Error types for the driver
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("GPX parsing error: {0}")]
    Gpx(#[from] gpx::errors::GpxError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Clipping error: {0}")]
    Clip(#[from] map_subset_lib::ClipError),

    #[error("Unsupported input file (expected .gpx or .json): {}", .0.display())]
    UnsupportedInput(PathBuf),
}

/// Subset the already-loaded `input` according to `settings`
pub fn subset_collection(
    settings: &Settings,
    input: &PolylineCollection<f64>,
) -> Result<PolylineCollection<f64>, CliError> {
    let subsetter = Subsetter::new(settings.config());

    let output = if settings.polygons {
        subsetter.clip_polygons(&settings.bounds, input)?
    } else {
        subsetter.subset_polylines(&settings.bounds, input)?
    };

    let info = SubsetInfo::new(input, &output);
    tracing::info!(
        "Kept {}/{} polylines, {}/{} vertices",
        info.output_polylines,
        info.input_polylines,
        info.output_vertices,
        info.input_vertices
    );
    Ok(output)
}

/// Run the whole pipeline: load, subset, write
pub fn run(settings: &Settings) -> Result<(), CliError> {
    tracing::debug!("Settings: {:?}", settings);

    let input = load_files(&settings.inputs)?;
    let output = subset_collection(settings, &input)?;

    match &settings.output {
        Some(path) => {
            let mut writer = std::io::BufWriter::new(std::fs::File::create(path)?);
            write_output(&mut writer, settings.bounds, &output, settings.pretty)?;
            writer.flush()?;
            tracing::info!("Wrote {}", path.display());
        }
        None => {
            let mut writer = std::io::BufWriter::new(std::io::stdout().lock());
            write_output(&mut writer, settings.bounds, &output, settings.pretty)?;
            writeln!(writer)?;
            writer.flush()?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use geo::Coord;

    fn c(x: f64, y: f64) -> Coord<f64> {
        Coord { x, y }
    }

    fn create_test_settings(extra: &[&str]) -> Settings {
        let mut args = vec!["map-subset", "--bounds", "0,0,10,10"];
        args.extend_from_slice(extra);
        args.push("unused.json");
        Settings::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_subset_polylines() {
        let settings = create_test_settings(&[]);
        let input = PolylineCollection::from_polylines([vec![c(-5.0, 5.0), c(15.0, 5.0)]]);

        let output = subset_collection(&settings, &input).unwrap();
        assert_eq!(output.vertices(), &[c(0.0, 5.0), c(10.0, 5.0)]);
    }

    #[test]
    fn test_clip_polygons() {
        let input =
            PolylineCollection::from_polylines([vec![c(5.0, 5.0), c(15.0, 5.0), c(5.0, 15.0)]]);

        let settings = create_test_settings(&["--polygons"]);
        let output = subset_collection(&settings, &input).unwrap();
        assert_eq!(output.counts(), &[4]);

        let settings = create_test_settings(&["--polygons", "--keep-degenerates"]);
        let output = subset_collection(&settings, &input).unwrap();
        assert_eq!(output.counts(), &[5]);
    }

    #[test]
    fn test_clip_errors_are_wrapped() {
        let settings = create_test_settings(&["--polygons"]);
        let input = PolylineCollection::from_polylines([vec![c(1.0, 1.0), c(2.0, 2.0)]]);

        let result = subset_collection(&settings, &input);
        assert!(matches!(result, Err(CliError::Clip(_))));
    }

    #[test]
    fn test_error_messages() {
        let err = CliError::UnsupportedInput(PathBuf::from("roads.csv"));
        assert!(err.to_string().contains("roads.csv"));

        let err = CliError::Clip(map_subset_lib::ClipError::InvalidResolution(-1.0));
        assert!(err.to_string().starts_with("Clipping error"));
    }
}
