use super::{BasemapStyle, MapSource, RasterLayer, RasterSource, StyleSpecification};
use crate::core::config::Credentials;
use std::collections::BTreeMap;

const STYLE_VERSION: u8 = 8;

const GAODE_VECTOR_URL: &str =
    "https://webrd01.is.autonavi.com/appmaptile?lang=zh_cn&size=1&scale=1&style=8&x={x}&y={y}&z={z}";
const GAODE_SATELLITE_URL: &str =
    "https://webst01.is.autonavi.com/appmaptile?style=6&x={x}&y={y}&z={z}";
const OSM_VECTOR_URL: &str = "https://tile.openstreetmap.org/{z}/{x}/{y}.png";
const OSM_SATELLITE_URL: &str =
    "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}";
const TIANDITU_WMTS_URL: &str = "http://t0.tianditu.gov.cn/{layer}_w/wmts?SERVICE=WMTS&REQUEST=GetTile&VERSION=1.0.0&LAYER={layer}&STYLE=default&TILEMATRIXSET=w&FORMAT=tiles&TILEMATRIX={z}&TILEROW={y}&TILECOL={x}&tk={key}";
const GOOGLE_VECTOR_URL: &str = "https://mt1.google.com/vt/lyrs=m&x={x}&y={y}&z={z}";
const GOOGLE_SATELLITE_URL: &str = "https://mt1.google.com/vt/lyrs=s&x={x}&y={y}&z={z}";

const GAODE_ATTRIBUTION: &str = "© 2024 AutoNavi";
const OSM_ATTRIBUTION: &str = "© OpenStreetMap contributors";
const ESRI_ATTRIBUTION: &str = "© Esri";
const TIANDITU_ATTRIBUTION: &str = "© Tianditu";
const GOOGLE_ATTRIBUTION: &str = "© Google Maps";

/// Builds the style for `source` rendered as `style`.
///
/// Deterministic in its inputs. Tianditu without a key yields exactly the
/// OpenStreetMap style.
pub fn build_style(
    source: MapSource,
    style: BasemapStyle,
    credentials: &Credentials,
) -> StyleSpecification {
    let key = credentials.tianditu_key();
    if source.requires_credential() && key.is_none() {
        log::warn!("{source} key not configured, falling back to OpenStreetMap tiles");
        return osm_style(style);
    }

    match source {
        MapSource::Gaode => gaode_style(style),
        MapSource::Osm => osm_style(style),
        MapSource::Tianditu => tianditu_style(style, key.unwrap_or_default()),
        MapSource::Google => google_style(style),
    }
}

/// Style builder bound to one set of credentials
#[derive(Debug, Clone, Default)]
pub struct StyleBuilder {
    credentials: Credentials,
}

impl StyleBuilder {
    pub fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }

    pub fn build(&self, source: MapSource, style: BasemapStyle) -> StyleSpecification {
        build_style(source, style, &self.credentials)
    }
}

/// Assembles a style with a vector and a satellite source and one layer
/// drawing whichever of the two `style` asks for.
fn two_variant_style(
    (vector_id, vector): (&str, RasterSource),
    (satellite_id, satellite): (&str, RasterSource),
    layer_id: &str,
    style: BasemapStyle,
    maxzoom: u8,
) -> StyleSpecification {
    let active = match style {
        BasemapStyle::Vector => vector_id,
        BasemapStyle::Satellite => satellite_id,
    };

    let mut sources = BTreeMap::new();
    sources.insert(vector_id.to_string(), vector);
    sources.insert(satellite_id.to_string(), satellite);

    StyleSpecification {
        version: STYLE_VERSION,
        sources,
        layers: vec![RasterLayer::new(layer_id, active, 0, maxzoom)],
    }
}

fn gaode_style(style: BasemapStyle) -> StyleSpecification {
    let layer_id = match style {
        BasemapStyle::Vector => "gaode-vec-layer",
        BasemapStyle::Satellite => "gaode-satellite-layer",
    };
    two_variant_style(
        (
            "gaode-vec",
            RasterSource::new(GAODE_VECTOR_URL).with_attribution(GAODE_ATTRIBUTION),
        ),
        (
            "gaode-satellite",
            RasterSource::new(GAODE_SATELLITE_URL).with_attribution(GAODE_ATTRIBUTION),
        ),
        layer_id,
        style,
        18,
    )
}

fn osm_style(style: BasemapStyle) -> StyleSpecification {
    two_variant_style(
        (
            "osm",
            RasterSource::new(OSM_VECTOR_URL).with_attribution(OSM_ATTRIBUTION),
        ),
        (
            "osm-satellite",
            RasterSource::new(OSM_SATELLITE_URL).with_attribution(ESRI_ATTRIBUTION),
        ),
        "osm-layer",
        style,
        19,
    )
}

fn tianditu_style(style: BasemapStyle, key: &str) -> StyleSpecification {
    let url = |layer: &str| {
        TIANDITU_WMTS_URL
            .replace("{layer}", layer)
            .replace("{key}", key)
    };
    two_variant_style(
        (
            "tianditu-vec",
            RasterSource::new(url("vec")).with_attribution(TIANDITU_ATTRIBUTION),
        ),
        (
            "tianditu-satellite",
            RasterSource::new(url("img")).with_attribution(TIANDITU_ATTRIBUTION),
        ),
        "tianditu-layer",
        style,
        18,
    )
}

fn google_style(style: BasemapStyle) -> StyleSpecification {
    two_variant_style(
        (
            "google-vec",
            RasterSource::new(GOOGLE_VECTOR_URL).with_attribution(GOOGLE_ATTRIBUTION),
        ),
        (
            "google-satellite",
            RasterSource::new(GOOGLE_SATELLITE_URL).with_attribution(GOOGLE_ATTRIBUTION),
        ),
        "google-layer",
        style,
        20,
    )
}
