//! The view state store.
//!
//! One owned instance is created by the composition root and passed by
//! reference to the map adapter and the sidebar. All mutation goes through the
//! named setters below or through [`ViewState::apply`].

use crate::core::airports::{AirportConfig, AirportRegistry};
use crate::core::config::ViewerConfig;
use crate::core::geo::LatLng;
use crate::input::events::ViewEvent;
use crate::style::{BasemapStyle, MapSource};
use std::fmt;
use std::sync::Arc;

/// Overlay layers the viewer can toggle. The set is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayLayer {
    Geofence,
    Parking,
    Runway,
    Taxiway,
}

impl OverlayLayer {
    pub const ALL: [OverlayLayer; 4] = [
        OverlayLayer::Geofence,
        OverlayLayer::Parking,
        OverlayLayer::Runway,
        OverlayLayer::Taxiway,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            OverlayLayer::Geofence => "geofence",
            OverlayLayer::Parking => "parking",
            OverlayLayer::Runway => "runway",
            OverlayLayer::Taxiway => "taxiway",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            OverlayLayer::Geofence => "Geofence",
            OverlayLayer::Parking => "Parking",
            OverlayLayer::Runway => "Runway",
            OverlayLayer::Taxiway => "Taxiway",
        }
    }
}

impl fmt::Display for OverlayLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Visibility flag for each overlay layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerVisibility {
    pub geofence: bool,
    pub parking: bool,
    pub runway: bool,
    pub taxiway: bool,
}

impl LayerVisibility {
    pub fn get(&self, layer: OverlayLayer) -> bool {
        match layer {
            OverlayLayer::Geofence => self.geofence,
            OverlayLayer::Parking => self.parking,
            OverlayLayer::Runway => self.runway,
            OverlayLayer::Taxiway => self.taxiway,
        }
    }

    pub fn set(&mut self, layer: OverlayLayer, visible: bool) {
        match layer {
            OverlayLayer::Geofence => self.geofence = visible,
            OverlayLayer::Parking => self.parking = visible,
            OverlayLayer::Runway => self.runway = visible,
            OverlayLayer::Taxiway => self.taxiway = visible,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (OverlayLayer, bool)> + '_ {
        OverlayLayer::ALL.into_iter().map(|layer| (layer, self.get(layer)))
    }
}

impl Default for LayerVisibility {
    fn default() -> Self {
        Self {
            geofence: true,
            parking: true,
            runway: true,
            taxiway: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    registry: Arc<AirportRegistry>,
    center: LatLng,
    zoom: f64,
    rotation: f64,
    map_style: BasemapStyle,
    map_source: MapSource,
    layer_visibility: LayerVisibility,
    selected_airport: Option<AirportConfig>,
    /// Bumped on every applied selection, including re-selecting the same airport
    selection: u64,
}

impl ViewState {
    /// Startup state: gaode vector basemap over the WNZ airport
    pub fn new(registry: Arc<AirportRegistry>) -> Self {
        Self::with_config(registry, &ViewerConfig::default())
    }

    pub fn with_config(registry: Arc<AirportRegistry>, config: &ViewerConfig) -> Self {
        let airport = registry.default_airport(&config.default_airport).clone();
        log::debug!("initial airport {} ({})", airport.code, airport.name);

        Self {
            center: airport.location,
            zoom: airport.default_zoom,
            rotation: airport.rotation_or_default(),
            map_style: config.initial_style,
            map_source: config.initial_source,
            layer_visibility: LayerVisibility::default(),
            selected_airport: Some(airport),
            selection: 0,
            registry,
        }
    }

    pub fn center(&self) -> LatLng {
        self.center
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn map_style(&self) -> BasemapStyle {
        self.map_style
    }

    pub fn map_source(&self) -> MapSource {
        self.map_source
    }

    pub fn layer_visibility(&self) -> &LayerVisibility {
        &self.layer_visibility
    }

    pub fn is_layer_visible(&self, layer: OverlayLayer) -> bool {
        self.layer_visibility.get(layer)
    }

    pub fn selected_airport(&self) -> Option<&AirportConfig> {
        self.selected_airport.as_ref()
    }

    pub fn selection_generation(&self) -> u64 {
        self.selection
    }

    pub fn registry(&self) -> &AirportRegistry {
        &self.registry
    }

    pub fn set_center(&mut self, center: LatLng) {
        self.center = center;
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom;
    }

    pub fn set_rotation(&mut self, rotation: f64) {
        self.rotation = rotation;
    }

    pub fn set_map_style(&mut self, style: BasemapStyle) {
        self.map_style = style;
    }

    pub fn set_map_source(&mut self, source: MapSource) {
        self.map_source = source;
    }

    pub fn toggle_layer(&mut self, layer: OverlayLayer, visible: bool) {
        self.layer_visibility.set(layer, visible);
    }

    /// Moves the camera to the airport with `code` and selects it.
    ///
    /// Unknown codes leave the state untouched; the return value tells the
    /// caller whether the selection was applied.
    pub fn select_airport(&mut self, code: &str) -> bool {
        let Some(airport) = self.registry.find(code).cloned() else {
            log::warn!("select_airport: unknown airport code {code}");
            return false;
        };

        self.center = airport.location;
        self.zoom = airport.default_zoom;
        self.rotation = airport.rotation_or_default();
        self.selected_airport = Some(airport);
        self.selection += 1;
        true
    }

    /// Drops the selection while keeping the camera where it is. Views then
    /// follow the stored center and zoom.
    pub fn clear_selection(&mut self) {
        self.selected_airport = None;
    }

    /// Dispatches one event to the matching setter. Returns whether the
    /// state changed.
    pub fn apply(&mut self, event: ViewEvent) -> bool {
        let before = self.clone();
        match event {
            ViewEvent::CameraChanged {
                center,
                zoom,
                rotation,
            } => {
                self.set_center(center);
                self.set_zoom(zoom);
                self.set_rotation(rotation);
            }
            ViewEvent::SourceSelected(source) => self.set_map_source(source),
            ViewEvent::StyleToggled(style) => self.set_map_style(style),
            ViewEvent::AirportSelected(code) => {
                self.select_airport(&code);
            }
            ViewEvent::LayerToggled { layer, visible } => self.toggle_layer(layer, visible),
        }
        *self != before
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(Arc::new(AirportRegistry::builtin()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_startup_state() {
        let state = ViewState::default();
        let airport = state.selected_airport().unwrap();

        assert_eq!(airport.code, "WNZ");
        assert_eq!(
            state.center().to_lng_lat(),
            [120.84804469204668, 27.908917928544973]
        );
        assert_eq!(state.zoom(), 17.0);
        assert_eq!(state.rotation(), 242.16);
        assert_eq!(state.map_source(), MapSource::Gaode);
        assert_eq!(state.map_style(), BasemapStyle::Vector);
        assert!(state.layer_visibility().iter().all(|(_, visible)| visible));
    }

    #[test]
    fn test_select_every_airport() {
        let mut state = ViewState::default();
        let airports: Vec<_> = state.registry().iter().cloned().collect();

        for airport in airports {
            assert!(state.select_airport(&airport.code));
            assert_eq!(state.center(), airport.location);
            assert_eq!(state.zoom(), airport.default_zoom);
            assert_eq!(state.rotation(), airport.rotation.unwrap_or(0.0));
            assert_eq!(state.selected_airport(), Some(&airport));
        }
    }

    #[test]
    fn test_select_unknown_airport_is_noop() {
        let mut state = ViewState::default();
        state.set_zoom(3.5);
        let before = state.clone();

        assert!(!state.select_airport("ZZZ"));
        assert_eq!(state, before);
        assert!(!state.apply(ViewEvent::AirportSelected("ZZZ".to_string())));
    }

    #[test]
    fn test_toggle_layer_touches_one_flag() {
        let mut state = ViewState::default();

        for layer in OverlayLayer::ALL {
            let before = state.clone();
            state.toggle_layer(layer, false);

            assert!(!state.is_layer_visible(layer));
            for (other, visible) in state.layer_visibility().iter() {
                if other != layer {
                    assert_eq!(visible, before.is_layer_visible(other));
                }
            }
            assert_eq!(state.center(), before.center());
            assert_eq!(state.zoom(), before.zoom());
            assert_eq!(state.map_source(), before.map_source());
            assert_eq!(state.selected_airport(), before.selected_airport());

            state.toggle_layer(layer, true);
            assert_eq!(state, before);
        }
    }

    #[test]
    fn test_apply_events() {
        let mut state = ViewState::default();

        assert!(state.apply(ViewEvent::SourceSelected(MapSource::Osm)));
        assert_eq!(state.map_source(), MapSource::Osm);
        assert!(!state.apply(ViewEvent::SourceSelected(MapSource::Osm)));

        assert!(state.apply(ViewEvent::StyleToggled(BasemapStyle::Satellite)));
        assert_eq!(state.map_style(), BasemapStyle::Satellite);

        assert!(state.apply(ViewEvent::CameraChanged {
            center: LatLng::new(30.0, 120.0),
            zoom: 12.5,
            rotation: -10.0,
        }));
        assert_eq!(state.center(), LatLng::new(30.0, 120.0));
        assert_eq!(state.zoom(), 12.5);
        assert_eq!(state.rotation(), -10.0);

        assert!(state.apply(ViewEvent::AirportSelected("KMG".to_string())));
        assert_eq!(state.selected_airport().unwrap().code, "KMG");

        assert!(state.apply(ViewEvent::LayerToggled {
            layer: OverlayLayer::Runway,
            visible: false,
        }));
        assert!(!state.is_layer_visible(OverlayLayer::Runway));
    }

    #[test]
    fn test_configured_default_airport() {
        let config = ViewerConfig {
            default_airport: "HRB".to_string(),
            initial_source: MapSource::Google,
            ..ViewerConfig::default()
        };
        let state = ViewState::with_config(Arc::new(AirportRegistry::builtin()), &config);

        assert_eq!(state.selected_airport().unwrap().code, "HRB");
        assert_eq!(state.map_source(), MapSource::Google);
    }

    #[test]
    fn test_clear_selection_keeps_camera() {
        let mut state = ViewState::default();
        state.set_zoom(12.0);
        state.clear_selection();

        assert!(state.selected_airport().is_none());
        assert_eq!(state.zoom(), 12.0);
        assert_eq!(state.center().to_lng_lat(), [120.84804469204668, 27.908917928544973]);

        assert!(state.select_airport("KMG"));
        assert_eq!(state.selected_airport().unwrap().code, "KMG");
    }
}
