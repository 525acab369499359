//! Basemap sources and the declarative style description handed to the map widget.

pub mod builder;

pub use builder::{build_style, StyleBuilder};

use crate::MapError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Tile provider supplying the basemap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MapSource {
    #[default]
    Gaode,
    Osm,
    Tianditu,
    Google,
}

impl MapSource {
    pub const ALL: [MapSource; 4] = [
        MapSource::Gaode,
        MapSource::Osm,
        MapSource::Tianditu,
        MapSource::Google,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MapSource::Gaode => "gaode",
            MapSource::Osm => "osm",
            MapSource::Tianditu => "tianditu",
            MapSource::Google => "google",
        }
    }

    /// Human readable provider name for selectors
    pub fn label(&self) -> &'static str {
        match self {
            MapSource::Gaode => "AutoNavi (Gaode)",
            MapSource::Osm => "OpenStreetMap",
            MapSource::Tianditu => "Tianditu",
            MapSource::Google => "Google Maps",
        }
    }

    /// Whether the provider needs an access key
    pub fn requires_credential(&self) -> bool {
        matches!(self, MapSource::Tianditu)
    }
}

impl fmt::Display for MapSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MapSource {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gaode" => Ok(MapSource::Gaode),
            "osm" => Ok(MapSource::Osm),
            "tianditu" => Ok(MapSource::Tianditu),
            "google" => Ok(MapSource::Google),
            other => Err(MapError::Config(format!("unknown map source: {other}"))),
        }
    }
}

/// Vector or satellite rendering of a source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BasemapStyle {
    #[default]
    Vector,
    Satellite,
}

impl BasemapStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            BasemapStyle::Vector => "vector",
            BasemapStyle::Satellite => "satellite",
        }
    }

    /// The other variant
    pub fn toggled(&self) -> Self {
        match self {
            BasemapStyle::Vector => BasemapStyle::Satellite,
            BasemapStyle::Satellite => BasemapStyle::Vector,
        }
    }
}

impl fmt::Display for BasemapStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BasemapStyle {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "vector" => Ok(BasemapStyle::Vector),
            "satellite" => Ok(BasemapStyle::Satellite),
            other => Err(MapError::Config(format!("unknown map style: {other}"))),
        }
    }
}

/// Raster tile source entry of a style
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RasterSource {
    #[serde(rename = "type")]
    pub kind: String,
    /// URL templates with `{z}`, `{x}` and `{y}` placeholders
    pub tiles: Vec<String>,
    pub tile_size: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribution: Option<String>,
}

impl RasterSource {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            kind: "raster".to_string(),
            tiles: vec![template.into()],
            tile_size: 256,
            attribution: None,
        }
    }

    pub fn with_attribution(mut self, attribution: impl Into<String>) -> Self {
        self.attribution = Some(attribution.into());
        self
    }
}

/// Raster layer drawing one source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RasterLayer {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    /// Id of the source in [`StyleSpecification::sources`]
    pub source: String,
    pub minzoom: u8,
    pub maxzoom: u8,
}

impl RasterLayer {
    pub fn new(id: impl Into<String>, source: impl Into<String>, minzoom: u8, maxzoom: u8) -> Self {
        Self {
            id: id.into(),
            kind: "raster".to_string(),
            source: source.into(),
            minzoom,
            maxzoom,
        }
    }
}

/// Declarative map style in the MapLibre style-JSON shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleSpecification {
    pub version: u8,
    pub sources: BTreeMap<String, RasterSource>,
    pub layers: Vec<RasterLayer>,
}

impl StyleSpecification {
    /// Layers that are drawn; every layer a style carries is visible
    pub fn visible_layers(&self) -> impl Iterator<Item = &RasterLayer> {
        self.layers.iter()
    }

    /// The layer painted as the basemap
    pub fn basemap_layer(&self) -> Option<&RasterLayer> {
        self.layers.first()
    }

    /// Source the basemap layer references
    pub fn basemap_source(&self) -> Option<&RasterSource> {
        self.basemap_layer()
            .and_then(|layer| self.sources.get(&layer.source))
    }

    /// Attribution text for the active basemap
    pub fn attribution(&self) -> Option<&str> {
        self.basemap_source()
            .and_then(|source| source.attribution.as_deref())
    }

    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
