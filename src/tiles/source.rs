use crate::core::geo::TileCoord;
use crate::style::{RasterSource, StyleSpecification};

/// Trait representing anything that can produce tile URLs for a given coordinate.
pub trait TileSource: Send + Sync {
    /// Build a URL for the requested `coord`.
    fn url(&self, coord: TileCoord) -> String;

    /// Zoom levels the source serves
    fn zoom_range(&self) -> (u8, u8) {
        (0, 18)
    }
}

/// Tile source expanding `{z}`, `{x}` and `{y}` in a URL template
#[derive(Debug, Clone, PartialEq)]
pub struct UrlTemplateSource {
    template: String,
    min_zoom: u8,
    max_zoom: u8,
}

impl UrlTemplateSource {
    pub fn new(template: impl Into<String>, min_zoom: u8, max_zoom: u8) -> Self {
        Self {
            template: template.into(),
            min_zoom,
            max_zoom,
        }
    }

    /// Source behind the basemap layer of `style`, if the style has one
    pub fn from_style(style: &StyleSpecification) -> Option<Self> {
        let layer = style.basemap_layer()?;
        let source: &RasterSource = style.sources.get(&layer.source)?;
        let template = source.tiles.first()?;
        Some(Self::new(template.clone(), layer.minzoom, layer.maxzoom))
    }

    pub fn template(&self) -> &str {
        &self.template
    }
}

impl TileSource for UrlTemplateSource {
    fn url(&self, coord: TileCoord) -> String {
        self.template
            .replace("{z}", &coord.z.to_string())
            .replace("{x}", &coord.x.to_string())
            .replace("{y}", &coord.y.to_string())
    }

    fn zoom_range(&self) -> (u8, u8) {
        (self.min_zoom, self.max_zoom)
    }
}
