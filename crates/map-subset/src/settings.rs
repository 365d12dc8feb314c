use clap::Parser;
use map_subset_lib::{Bounds, Config};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
/// Map Subset - Clip GPX tracks and polyline files to a longitude-latitude bounding box
pub struct Settings {
    /// GPX (.gpx) or polyline JSON (.json) files to subset
    #[clap(value_name = "FILE", required = true)]
    pub inputs: Vec<PathBuf>,

    /// Bounding box as LON_MIN,LAT_MIN,LON_MAX,LAT_MAX in degrees
    #[clap(short, long, value_parser = parse_bounds, allow_hyphen_values = true)]
    pub bounds: Bounds<f64>,

    /// Minimum per-axis separation between kept vertices, in degrees (0 keeps all)
    #[clap(short, long, default_value = "0.0")]
    pub resolution: f64,

    /// Treat every input polyline as a closed polygon ring
    #[clap(long, default_value = "false")]
    pub polygons: bool,

    /// Keep repeated vertices and zero-area artifacts in clipped polygons
    #[clap(long, default_value = "false")]
    pub keep_degenerates: bool,

    /// Minimum number of polylines before subsetting runs on all cores (0 = never)
    #[clap(long, default_value = "1024")]
    pub parallel_threshold: usize,

    /// Output file (stdout when omitted)
    #[clap(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[clap(long, default_value = "false")]
    pub pretty: bool,
}

impl Settings {
    /// Parse the process arguments, printing usage and exiting on error
    pub fn from_cli() -> Self {
        match Settings::try_parse() {
            Ok(args) => args,
            Err(e) => e.exit(),
        }
    }

    /// Library configuration derived from these settings
    pub fn config(&self) -> Config {
        Config {
            resolution: self.resolution,
            discard_degenerates: !self.keep_degenerates,
            parallel_threshold: self.parallel_threshold,
        }
    }
}

/// Parse `LON_MIN,LAT_MIN,LON_MAX,LAT_MAX` into validated bounds
fn parse_bounds(value: &str) -> Result<Bounds<f64>, String> {
    let parts = value
        .split(',')
        .map(|part| part.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("invalid number in bounds: {}", e))?;

    match parts.as_slice() {
        &[lon_min, lat_min, lon_max, lat_max] => {
            Bounds::new(lon_min, lat_min, lon_max, lat_max).map_err(|e| e.to_string())
        }
        _ => Err(format!(
            "expected 4 comma-separated values, got {}",
            parts.len()
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal() {
        let settings =
            Settings::try_parse_from(["map-subset", "--bounds", "-10,-5,10,5", "track.gpx"])
                .unwrap();

        assert_eq!(settings.inputs, vec![PathBuf::from("track.gpx")]);
        assert_eq!(settings.bounds, Bounds::new(-10.0, -5.0, 10.0, 5.0).unwrap());
        assert_eq!(settings.resolution, 0.0);
        assert!(!settings.polygons);
        assert!(settings.output.is_none());
        assert_eq!(settings.config(), Config::default());
    }

    #[test]
    fn test_parse_all_options() {
        let settings = Settings::try_parse_from([
            "map-subset",
            "-b",
            "0, 40, 3.5, 43",
            "-r",
            "0.001",
            "--polygons",
            "--keep-degenerates",
            "--parallel-threshold",
            "0",
            "-o",
            "out.json",
            "--pretty",
            "a.json",
            "b.gpx",
        ])
        .unwrap();

        assert_eq!(settings.inputs.len(), 2);
        assert!(settings.polygons);
        assert!(settings.pretty);
        assert_eq!(settings.output, Some(PathBuf::from("out.json")));

        let config = settings.config();
        assert_eq!(config.resolution, 0.001);
        assert!(!config.discard_degenerates);
        assert_eq!(config.parallel_threshold, 0);
    }

    #[test]
    fn test_parse_bounds_errors() {
        assert!(parse_bounds("1,2,3").is_err());
        assert!(parse_bounds("a,2,3,4").is_err());
        // lon_min > lon_max
        assert!(parse_bounds("10,0,5,1").is_err());
        // Latitude out of range
        assert!(parse_bounds("0,-95,1,1").is_err());
        assert!(parse_bounds("-180,-90,180,90").is_ok());
    }

    #[test]
    fn test_missing_required_arguments() {
        assert!(Settings::try_parse_from(["map-subset", "track.gpx"]).is_err());
        assert!(Settings::try_parse_from(["map-subset", "--bounds", "0,0,1,1"]).is_err());
    }
}
