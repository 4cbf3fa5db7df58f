//! Parcel ingest from JSON documents and CSV tables.
//!
//! Both paths produce `ParcelInput`s whose feature maps are still raw; all
//! defaulting happens later in `FeatureBundle::from_raw`. What is rejected here
//! is only what cannot be interpreted at all:
//! - unreadable files, malformed JSON, missing CSV headers (exit code 2)
//! - CSV rows with unparseable or out-of-range coordinates (skipped, reported)

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use csv::StringRecord;
use serde::Deserialize;
use serde_json::{Map, Number, Value};

use crate::domain::{ParcelGeometry, ParcelInput};
use crate::error::AppError;
use crate::features::{ENVIRONMENTAL_KEYS, RawFeatures, TERRAIN_KEYS};

/// A row-level error encountered during CSV ingest.
#[derive(Debug, Clone, PartialEq)]
pub struct RowError {
    pub line: usize,
    pub id: Option<String>,
    pub message: String,
}

/// CSV ingest output: parcels plus the rows that had to be skipped.
#[derive(Debug, Clone, Default)]
pub struct ParcelBatch {
    pub parcels: Vec<ParcelInput>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ParcelFile {
    Many(Vec<ParcelDocument>),
    One(ParcelDocument),
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ParcelDocument {
    id: Option<Value>,
    geometry: Option<ParcelGeometry>,
    /// `[lon, lat]`
    centroid: Option<[f64; 2]>,
    boundary: Option<Boundary>,
    terrain: Value,
    environmental: Value,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Boundary {
    centroid: Option<[f64; 2]>,
}

/// Read one parcel object, or an array of them, from a JSON file.
pub fn read_parcels_json(path: &Path) -> Result<Vec<ParcelInput>, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::usage(format!("Failed to open parcel file '{}': {e}", path.display()))
    })?;
    let doc: ParcelFile = serde_json::from_reader(BufReader::new(file)).map_err(|e| {
        AppError::usage(format!("Invalid parcel JSON '{}': {e}", path.display()))
    })?;
    let parcels = from_documents(doc);
    if parcels.is_empty() {
        return Err(AppError::usage(format!(
            "Parcel file '{}' contains no parcels.",
            path.display()
        )));
    }
    Ok(parcels)
}

/// Parse parcels from a JSON string (same shapes as `read_parcels_json`).
pub fn parse_parcels_json(text: &str) -> Result<Vec<ParcelInput>, AppError> {
    let doc: ParcelFile = serde_json::from_str(text)
        .map_err(|e| AppError::usage(format!("Invalid parcel JSON: {e}")))?;
    Ok(from_documents(doc))
}

fn from_documents(file: ParcelFile) -> Vec<ParcelInput> {
    let docs = match file {
        ParcelFile::Many(docs) => docs,
        ParcelFile::One(doc) => vec![doc],
    };
    docs.into_iter()
        .enumerate()
        .map(|(idx, doc)| into_parcel(doc, idx + 1))
        .collect()
}

fn into_parcel(doc: ParcelDocument, ordinal: usize) -> ParcelInput {
    let id = match doc.id {
        Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => format!("parcel-{ordinal}"),
    };

    // An explicit geometry wins only when it yields a location.
    let geometry = doc
        .geometry
        .filter(|g| g.centroid().is_some())
        .or_else(|| {
            doc.centroid
                .or_else(|| doc.boundary.and_then(|b| b.centroid))
                .map(|[lon, lat]| ParcelGeometry::point(lat, lon))
        })
        .unwrap_or_default();

    ParcelInput {
        id,
        geometry,
        features: RawFeatures::from_values(doc.terrain, doc.environmental),
    }
}

/// Load parcels from a CSV file.
///
/// Columns: `id`, `latitude`, `longitude`, plus any terrain or environmental
/// feature key. Blank cells are missing values.
pub fn read_parcels_csv(path: &Path) -> Result<ParcelBatch, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::usage(format!("Failed to open CSV '{}': {e}", path.display()))
    })?;
    let batch = parse_parcels_csv(file)?;
    if batch.parcels.is_empty() {
        return Err(AppError::usage(format!(
            "No valid parcel rows in '{}'.",
            path.display()
        )));
    }
    Ok(batch)
}

pub fn parse_parcels_csv<R: Read>(input: R) -> Result<ParcelBatch, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader
        .headers()
        .map_err(|e| AppError::usage(format!("Failed to read CSV headers: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);

    let unused: Vec<&str> = header_map
        .keys()
        .map(String::as_str)
        .filter(|name| column_target(name).is_none() && !matches!(*name, "id" | "latitude" | "longitude"))
        .collect();
    if !unused.is_empty() {
        log::debug!("ignoring CSV columns: {}", unused.join(", "));
    }

    let mut batch = ParcelBatch::default();
    for (idx, result) in reader.records().enumerate() {
        // records() starts after the header line
        let line = idx + 2;
        batch.rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                batch.row_errors.push(RowError {
                    line,
                    id: None,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match parse_row(&record, &header_map, line) {
            Ok(parcel) => batch.parcels.push(parcel),
            Err((id, message)) => {
                log::warn!("skipping CSV line {line}: {message}");
                batch.row_errors.push(RowError { line, id, message });
            }
        }
    }

    Ok(batch)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Terrain,
    Environmental,
}

fn column_target(name: &str) -> Option<Target> {
    if TERRAIN_KEYS.contains(&name) {
        Some(Target::Terrain)
    } else if ENVIRONMENTAL_KEYS.contains(&name) {
        Some(Target::Environmental)
    } else {
        None
    }
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports may prefix the first header with a BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    match name.to_ascii_lowercase().as_str() {
        "lat" => "latitude".to_string(),
        "lon" | "lng" => "longitude".to_string(),
        other => other.to_string(),
    }
}

fn parse_row(
    record: &StringRecord,
    header_map: &HashMap<String, usize>,
    line: usize,
) -> Result<ParcelInput, (Option<String>, String)> {
    let id = get_optional(record, header_map, "id").map(str::to_string);

    let geometry = parse_location(record, header_map).map_err(|e| (id.clone(), e))?;

    let mut terrain = Map::new();
    let mut environmental = Map::new();
    for (name, &idx) in header_map {
        let Some(target) = column_target(name) else {
            continue;
        };
        let Some(cell) = record.get(idx).map(str::trim).filter(|s| !s.is_empty()) else {
            continue;
        };
        let value = cell_value(cell);
        match target {
            Target::Terrain => terrain.insert(name.clone(), value),
            Target::Environmental => environmental.insert(name.clone(), value),
        };
    }

    Ok(ParcelInput {
        id: id.unwrap_or_else(|| format!("row-{line}")),
        geometry,
        features: RawFeatures::new(terrain, environmental),
    })
}

fn parse_location(
    record: &StringRecord,
    header_map: &HashMap<String, usize>,
) -> Result<ParcelGeometry, String> {
    let lat = get_optional(record, header_map, "latitude");
    let lon = get_optional(record, header_map, "longitude");
    match (lat, lon) {
        (None, None) => Ok(ParcelGeometry::Unknown),
        (Some(_), None) | (None, Some(_)) => {
            Err("`latitude` and `longitude` must be given together.".to_string())
        }
        (Some(lat), Some(lon)) => {
            let lat = parse_f64(lat).ok_or_else(|| format!("Invalid `latitude` value '{lat}'."))?;
            let lon = parse_f64(lon).ok_or_else(|| format!("Invalid `longitude` value '{lon}'."))?;
            if !(-90.0..=90.0).contains(&lat) {
                return Err(format!("`latitude` out of range: {lat}"));
            }
            if !(-180.0..=180.0).contains(&lon) {
                return Err(format!("`longitude` out of range: {lon}"));
            }
            Ok(ParcelGeometry::point(lat, lon))
        }
    }
}

/// Numbers become JSON numbers; anything else (land-cover names) stays text.
fn cell_value(cell: &str) -> Value {
    // Integers stay integers so class codes like `40` read back as codes.
    if let Ok(int) = cell.parse::<i64>() {
        return Value::Number(int.into());
    }
    parse_f64(cell)
        .and_then(Number::from_f64)
        .map(Value::Number)
        .unwrap_or_else(|| Value::String(cell.to_string()))
}

fn get_optional<'a>(record: &'a StringRecord, header_map: &HashMap<String, usize>, name: &str) -> Option<&'a str> {
    let idx = header_map.get(name)?;
    record.get(*idx).map(str::trim).filter(|s| !s.is_empty())
}

fn parse_f64(s: &str) -> Option<f64> {
    let v = s.parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FeatureBundle;
    use crate::domain::LandCover;

    #[test]
    fn json_single_object_with_centroid() {
        let parcels = parse_parcels_json(
            r#"{
                "id": "lot-7",
                "centroid": [3.06, 36.75],
                "terrain": {"slope": 12.5, "elevation": null},
                "environmental": {"ndvi": "0.42"}
            }"#,
        )
        .unwrap();
        assert_eq!(parcels.len(), 1);
        let parcel = &parcels[0];
        assert_eq!(parcel.id, "lot-7");
        assert_eq!(parcel.geometry, ParcelGeometry::point(36.75, 3.06));

        let bundle = FeatureBundle::from_raw(&parcel.geometry, &parcel.features);
        assert_eq!(bundle.slope, 12.5);
        assert_eq!(bundle.elevation, 100.0);
        assert!((bundle.vegetation_index - 0.42).abs() < 1e-12);
    }

    #[test]
    fn json_array_with_boundary_and_geometry() {
        let parcels = parse_parcels_json(
            r#"[
                {"boundary": {"centroid": [2.35, 48.85]}},
                {"id": 42, "geometry": {"type": "polygon", "ring": [[0,0],[2,0],[2,2],[0,2],[0,0]]}},
                {"geometry": {"type": "unknown"}, "centroid": [1.0, 2.0], "terrain": null}
            ]"#,
        )
        .unwrap();
        assert_eq!(parcels.len(), 3);
        assert_eq!(parcels[0].id, "parcel-1");
        assert_eq!(parcels[0].geometry, ParcelGeometry::point(48.85, 2.35));
        assert_eq!(parcels[1].id, "42");
        let c = parcels[1].geometry.centroid().unwrap();
        assert!((c.latitude - 1.0).abs() < 1e-12 && (c.longitude - 1.0).abs() < 1e-12);
        assert_eq!(parcels[2].geometry, ParcelGeometry::point(2.0, 1.0));
        assert!(parcels[2].features.terrain.is_empty());
    }

    #[test]
    fn json_without_location_keeps_unknown_geometry() {
        let parcels = parse_parcels_json(r#"{"terrain": {"slope": 3}}"#).unwrap();
        assert_eq!(parcels[0].geometry, ParcelGeometry::Unknown);
    }

    #[test]
    fn malformed_json_is_a_usage_error() {
        let err = parse_parcels_json("{not json").unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn csv_routes_columns_and_skips_blank_cells() {
        let csv = "\u{feff}id,lat,lon,slope,elevation,ndvi,land_cover,owner\n\
                   A,36.7,3.1,14,,0.2,shrubland,alice\n\
                   B,,,2.5,40,,,bob\n";
        let batch = parse_parcels_csv(csv.as_bytes()).unwrap();
        assert_eq!(batch.rows_read, 2);
        assert!(batch.row_errors.is_empty());
        assert_eq!(batch.parcels.len(), 2);

        let a = &batch.parcels[0];
        assert_eq!(a.id, "A");
        assert_eq!(a.geometry, ParcelGeometry::point(36.7, 3.1));
        assert!(!a.features.terrain.contains_key("elevation"));
        assert!(!a.features.terrain.contains_key("owner"));
        let bundle = FeatureBundle::from_raw(&a.geometry, &a.features);
        assert_eq!(bundle.slope, 14.0);
        assert_eq!(bundle.elevation, 100.0);
        assert_eq!(bundle.land_cover, LandCover::Shrubland);

        let b = &batch.parcels[1];
        assert_eq!(b.geometry, ParcelGeometry::Unknown);
        assert!(b.features.environmental.is_empty());
    }

    #[test]
    fn csv_bad_coordinates_are_row_errors() {
        let csv = "id,latitude,longitude,slope\n\
                   ok,10,10,1\n\
                   bad,north,10,1\n\
                   far,95,10,1\n\
                   half,10,,1\n\
                   ,1,1,1\n";
        let batch = parse_parcels_csv(csv.as_bytes()).unwrap();
        assert_eq!(batch.rows_read, 5);
        let ids: Vec<&str> = batch.parcels.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["ok", "row-6"]);
        let lines: Vec<usize> = batch.row_errors.iter().map(|e| e.line).collect();
        assert_eq!(lines, vec![3, 4, 5]);
        assert_eq!(batch.row_errors[0].id.as_deref(), Some("bad"));
    }

    #[test]
    fn missing_csv_file_is_a_usage_error() {
        let err = read_parcels_csv(Path::new("/nonexistent/parcels.csv")).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
