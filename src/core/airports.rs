//! Compiled-in airport table and the registry wrapping it.

use crate::core::geo::LatLng;
use crate::{MapError, Result};
use fxhash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Code of the airport selected at startup when none is configured.
pub const DEFAULT_AIRPORT_CODE: &str = "WNZ";

/// A named location the viewer can jump to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AirportConfig {
    pub name: String,
    /// IATA-like code, unique within a registry
    pub code: String,
    pub location: LatLng,
    pub default_zoom: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
}

impl AirportConfig {
    pub fn new(name: &str, code: &str, lng_lat: [f64; 2], default_zoom: f64) -> Self {
        Self {
            name: name.to_string(),
            code: code.to_string(),
            location: LatLng::from_lng_lat(lng_lat),
            default_zoom,
            rotation: None,
        }
    }

    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = Some(rotation);
        self
    }

    /// Rotation with the absent case read as 0
    pub fn rotation_or_default(&self) -> f64 {
        self.rotation.unwrap_or(0.0)
    }
}

/// Ordered, non-empty list of airports with unique codes.
#[derive(Debug, Clone, PartialEq)]
pub struct AirportRegistry {
    airports: Vec<AirportConfig>,
}

impl AirportRegistry {
    /// Validates and wraps a list of airports
    pub fn new(airports: Vec<AirportConfig>) -> Result<Self> {
        if airports.is_empty() {
            return Err(MapError::InvalidAirport(
                "airport registry must not be empty".to_string(),
            ));
        }

        let mut seen = FxHashSet::default();
        for airport in &airports {
            if !seen.insert(airport.code.as_str()) {
                return Err(MapError::InvalidAirport(format!(
                    "duplicate airport code {}",
                    airport.code
                )));
            }
        }

        Ok(Self { airports })
    }

    /// The six airports the viewer ships with
    pub fn builtin() -> Self {
        Self {
            airports: vec![
                AirportConfig::new(
                    "Wenzhou Longwan International Airport",
                    "WNZ",
                    [120.84804469204668, 27.908917928544973],
                    17.0,
                )
                .with_rotation(242.16),
                AirportConfig::new(
                    "Macau International Airport",
                    "MFM",
                    [113.58344294221139, 22.14885494463295],
                    16.0,
                )
                .with_rotation(289.0),
                AirportConfig::new(
                    "Nanyang Jiangying Airport",
                    "NNY",
                    [112.61590528659953, 32.98301160023536],
                    16.0,
                )
                .with_rotation(48.0),
                AirportConfig::new(
                    "Harbin Taiping International Airport",
                    "HRB",
                    [126.2490, 45.6251],
                    15.0,
                )
                .with_rotation(231.0),
                AirportConfig::new(
                    "Shanghai Pudong International Airport",
                    "PVG",
                    [121.8053, 31.1443],
                    15.0,
                ),
                AirportConfig::new(
                    "Kunming Changshui International Airport",
                    "KMG",
                    [102.93533650951389, 25.11040567469039],
                    16.0,
                )
                .with_rotation(52.0),
            ],
        }
    }

    /// Parses a JSON array of airports
    pub fn from_json(json: &str) -> Result<Self> {
        let airports: Vec<AirportConfig> = serde_json::from_str(json)?;
        Self::new(airports)
    }

    /// Loads a JSON airport list from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let registry = Self::from_json(&json)?;
        log::info!(
            "loaded {} airports from {}",
            registry.len(),
            path.display()
        );
        Ok(registry)
    }

    pub fn find(&self, code: &str) -> Option<&AirportConfig> {
        self.airports.iter().find(|a| a.code == code)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.find(code).is_some()
    }

    /// The airport with `code`, falling back to the first entry
    pub fn default_airport(&self, code: &str) -> &AirportConfig {
        self.find(code).unwrap_or(&self.airports[0])
    }

    pub fn iter(&self) -> impl Iterator<Item = &AirportConfig> {
        self.airports.iter()
    }

    pub fn len(&self) -> usize {
        self.airports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.airports.is_empty()
    }
}

impl Default for AirportRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_registry() {
        let registry = AirportRegistry::builtin();
        assert_eq!(registry.len(), 6);

        let wnz = registry.find("WNZ").unwrap();
        assert_eq!(wnz.location.to_lng_lat(), [120.84804469204668, 27.908917928544973]);
        assert_eq!(wnz.default_zoom, 17.0);
        assert_eq!(wnz.rotation, Some(242.16));

        let pvg = registry.find("PVG").unwrap();
        assert_eq!(pvg.rotation, None);
        assert_eq!(pvg.rotation_or_default(), 0.0);

        assert!(registry.find("XXX").is_none());
    }

    #[test]
    fn test_default_airport_falls_back_to_first() {
        let registry = AirportRegistry::new(vec![
            AirportConfig::new("Alpha", "AAA", [1.0, 2.0], 10.0),
            AirportConfig::new("Bravo", "BBB", [3.0, 4.0], 11.0),
        ])
        .unwrap();

        assert_eq!(registry.default_airport("BBB").code, "BBB");
        assert_eq!(registry.default_airport(DEFAULT_AIRPORT_CODE).code, "AAA");
    }

    #[test]
    fn test_from_json() {
        let json = r#"[
            {"name": "Test Field", "code": "TST", "location": [100.5, 20.25], "defaultZoom": 14, "rotation": 90},
            {"name": "Other", "code": "OTH", "location": [101.0, 21.0], "defaultZoom": 12}
        ]"#;
        let registry = AirportRegistry::from_json(json).unwrap();

        let tst = registry.find("TST").unwrap();
        assert_eq!(tst.location, LatLng::new(20.25, 100.5));
        assert_eq!(tst.default_zoom, 14.0);
        assert_eq!(tst.rotation, Some(90.0));
        assert_eq!(registry.find("OTH").unwrap().rotation, None);
    }

    #[test]
    fn test_rejects_empty_and_duplicate_lists() {
        assert!(matches!(
            AirportRegistry::from_json("[]"),
            Err(MapError::InvalidAirport(_))
        ));

        let dup = vec![
            AirportConfig::new("A", "DUP", [0.0, 0.0], 10.0),
            AirportConfig::new("B", "DUP", [1.0, 1.0], 10.0),
        ];
        assert!(matches!(
            AirportRegistry::new(dup),
            Err(MapError::InvalidAirport(_))
        ));

        assert!(matches!(
            AirportRegistry::from_json("not json"),
            Err(MapError::Serialization(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(
            &mut file,
            br#"[{"name": "Disk Field", "code": "DSK", "location": [8.5, 47.45], "defaultZoom": 15, "rotation": 280}]"#,
        )
        .unwrap();

        let registry = AirportRegistry::load(file.path()).unwrap();
        assert_eq!(registry.len(), 1);
        let dsk = registry.find("DSK").unwrap();
        assert_eq!(dsk.location.to_lng_lat(), [8.5, 47.45]);
        assert_eq!(dsk.rotation, Some(280.0));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("airports.json");

        assert!(matches!(
            AirportRegistry::load(&missing),
            Err(MapError::Io(_))
        ));
    }
}
