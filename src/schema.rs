//! Coordinate-schema mapping.
//!
//! Input exports name their coordinate columns several different ways. Instead
//! of ad-hoc column-name heuristics, the known layouts are enumerated in an
//! explicit mapping table that is tested independently of the pipeline.

use std::collections::HashMap;

/// Where one coordinate pair comes from in a given schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinateSource {
    /// Separate numeric latitude and longitude columns.
    Split {
        /// Latitude column name
        lat: &'static str,
        /// Longitude column name
        lng: &'static str,
    },
    /// A single combined `"lat,lng"` string column (may carry `°` marks).
    Combined {
        /// Combined column name
        column: &'static str,
    },
}

impl CoordinateSource {
    /// Whether every column this source reads from is present.
    pub fn is_present(&self, columns: &[String]) -> bool {
        match self {
            CoordinateSource::Split { lat, lng } => {
                columns.iter().any(|c| c == lat) && columns.iter().any(|c| c == lng)
            }
            CoordinateSource::Combined { column } => columns.iter().any(|c| c == column),
        }
    }

    /// Extracts the coordinate pair from one row.
    ///
    /// Each side degrades to `None` independently when missing or unparsable.
    pub fn extract(&self, row: &HashMap<String, String>) -> (Option<f64>, Option<f64>) {
        match self {
            CoordinateSource::Split { lat, lng } => (
                row.get(*lat).and_then(|v| parse_coordinate(v)),
                row.get(*lng).and_then(|v| parse_coordinate(v)),
            ),
            CoordinateSource::Combined { column } => match row.get(*column) {
                Some(value) => split_latlng(value),
                None => (None, None),
            },
        }
    }
}

/// One known input layout: a name, a start-coordinate source, and an optional
/// end-coordinate source.
#[derive(Debug, Clone, Copy)]
pub struct SchemaMapping {
    /// Short schema name used in logs
    pub name: &'static str,
    /// Source of the start coordinate pair
    pub start: CoordinateSource,
    /// Source of the end coordinate pair, when the layout has one
    pub end: Option<CoordinateSource>,
}

impl SchemaMapping {
    /// A schema matches when its start source is fully present. End columns
    /// are optional: absent ones read as unknown locations.
    pub fn matches(&self, columns: &[String]) -> bool {
        self.start.is_present(columns)
    }
}

/// The enumerated schema-mapping table, in detection priority order.
pub const KNOWN_SCHEMAS: &[SchemaMapping] = &[
    SchemaMapping {
        name: "processed",
        start: CoordinateSource::Split {
            lat: "start_latitude",
            lng: "start_longitude",
        },
        end: Some(CoordinateSource::Split {
            lat: "end_latitude",
            lng: "end_longitude",
        }),
    },
    SchemaMapping {
        name: "flat",
        start: CoordinateSource::Split {
            lat: "latitude",
            lng: "longitude",
        },
        end: Some(CoordinateSource::Split {
            lat: "end_latitude",
            lng: "end_longitude",
        }),
    },
    SchemaMapping {
        name: "semantic-activity",
        start: CoordinateSource::Combined {
            column: "activity.start.latLng",
        },
        end: Some(CoordinateSource::Combined {
            column: "activity.end.latLng",
        }),
    },
    SchemaMapping {
        name: "semantic-visit",
        start: CoordinateSource::Combined {
            column: "visit.topCandidate.placeLocation.latLng",
        },
        end: None,
    },
];

/// Picks the first schema in [`KNOWN_SCHEMAS`] whose required columns are all
/// present, or `None` when nothing matches.
pub fn detect_schema(columns: &[String]) -> Option<&'static SchemaMapping> {
    KNOWN_SCHEMAS.iter().find(|schema| schema.matches(columns))
}

/// Splits a combined `"lat,lng"` string into a coordinate pair.
///
/// Degree signs are stripped and both sides trimmed before parsing; any
/// failure yields `(None, None)`.
pub fn split_latlng(value: &str) -> (Option<f64>, Option<f64>) {
    let Some((lat, lng)) = value.split_once(',') else {
        return (None, None);
    };
    match (parse_coordinate(lat), parse_coordinate(lng)) {
        (Some(lat), Some(lng)) => (Some(lat), Some(lng)),
        _ => (None, None),
    }
}

/// Parses a single coordinate cell, tolerating degree signs and surrounding
/// whitespace. Empty or malformed cells yield `None`.
pub fn parse_coordinate(value: &str) -> Option<f64> {
    let cleaned = value.replace('\u{00b0}', "");
    let trimmed = cleaned.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    fn row(cells: &[(&str, &str)]) -> HashMap<String, String> {
        cells
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_detect_processed_schema() {
        let schema = detect_schema(&cols(&[
            "id",
            "start_latitude",
            "start_longitude",
            "end_latitude",
            "end_longitude",
        ]))
        .unwrap();
        assert_eq!(schema.name, "processed");
    }

    #[test]
    fn test_detect_flat_schema() {
        let schema = detect_schema(&cols(&["id", "latitude", "longitude"])).unwrap();
        assert_eq!(schema.name, "flat");
    }

    #[test]
    fn test_detect_semantic_activity_schema() {
        let schema = detect_schema(&cols(&[
            "activity.start.latLng",
            "activity.end.latLng",
            "activity.distanceMeters",
        ]))
        .unwrap();
        assert_eq!(schema.name, "semantic-activity");
    }

    #[test]
    fn test_detect_semantic_visit_schema() {
        let schema =
            detect_schema(&cols(&["visit.topCandidate.placeLocation.latLng"])).unwrap();
        assert_eq!(schema.name, "semantic-visit");
        assert!(schema.end.is_none());
    }

    #[test]
    fn test_detect_no_schema() {
        assert!(detect_schema(&cols(&["id", "name", "timestamp"])).is_none());
    }

    #[test]
    fn test_processed_takes_priority_over_flat() {
        // A table with both layouts should resolve to the more specific one
        let schema = detect_schema(&cols(&[
            "latitude",
            "longitude",
            "start_latitude",
            "start_longitude",
        ]))
        .unwrap();
        assert_eq!(schema.name, "processed");
    }

    #[test]
    fn test_split_latlng_plain() {
        assert_eq!(split_latlng("40.7128,-74.006"), (Some(40.7128), Some(-74.006)));
    }

    #[test]
    fn test_split_latlng_degree_signs_and_whitespace() {
        assert_eq!(
            split_latlng("40.7128°, -74.006°"),
            (Some(40.7128), Some(-74.006))
        );
    }

    #[test]
    fn test_split_latlng_malformed() {
        assert_eq!(split_latlng("not coordinates"), (None, None));
        assert_eq!(split_latlng("40.7128"), (None, None));
        assert_eq!(split_latlng("40.7128,abc"), (None, None));
        assert_eq!(split_latlng(""), (None, None));
    }

    #[test]
    fn test_split_source_extract() {
        let source = CoordinateSource::Split {
            lat: "latitude",
            lng: "longitude",
        };
        let (lat, lng) = source.extract(&row(&[("latitude", "40.7"), ("longitude", "-74.0")]));
        assert_eq!((lat, lng), (Some(40.7), Some(-74.0)));

        // One side missing degrades independently
        let (lat, lng) = source.extract(&row(&[("latitude", "40.7")]));
        assert_eq!((lat, lng), (Some(40.7), None));
    }

    #[test]
    fn test_combined_source_extract() {
        let source = CoordinateSource::Combined {
            column: "activity.start.latLng",
        };
        let (lat, lng) = source.extract(&row(&[("activity.start.latLng", "40.7°,-74.0°")]));
        assert_eq!((lat, lng), (Some(40.7), Some(-74.0)));

        let (lat, lng) = source.extract(&row(&[]));
        assert_eq!((lat, lng), (None, None));
    }

    #[test]
    fn test_parse_coordinate_empty() {
        assert_eq!(parse_coordinate(""), None);
        assert_eq!(parse_coordinate("  "), None);
        assert_eq!(parse_coordinate(" 12.5° "), Some(12.5));
    }
}
