//! Map view adapter
//!
//! Owns the one map widget of a view and keeps it in agreement with the
//! [`ViewState`] store:
//!
//! - style is rebuilt and swapped when the basemap source or style changes,
//! - the camera moves when a different airport is selected,
//! - settled camera moves (`MoveEnd`) are written back into the store.
//!
//! The widget is reached only through [`MapWidget`], so the reconciliation
//! rules can be exercised against an in-memory widget.

use crate::core::camera::Camera;
use crate::core::config::{CameraTransition, ViewerConfig};
use crate::core::state::ViewState;
use crate::input::events::{ViewEvent, WidgetEvent};
use crate::style::{BasemapStyle, MapSource, StyleBuilder, StyleSpecification};
use crate::Result;
use std::time::Duration;

/// Minimal imperative surface of a rendering widget
pub trait MapWidget {
    /// Camera as currently displayed
    fn camera(&self) -> Camera;

    /// Sets the camera immediately
    fn jump_to(&mut self, camera: Camera);

    /// Animates to `camera`; a `MoveEnd` follows when the animation settles
    fn fly_to(&mut self, camera: Camera, duration: Duration);

    /// Replaces the whole style; a newer call supersedes a pending one
    fn set_style(&mut self, style: StyleSpecification);

    fn set_attribution(&mut self, text: Option<String>);

    /// Drains camera notifications produced since the last call
    fn poll_events(&mut self) -> Vec<WidgetEvent>;

    /// Releases everything the widget holds
    fn remove(&mut self);
}

/// Everything needed to construct a widget
#[derive(Debug, Clone, PartialEq)]
pub struct MountOptions {
    pub style: StyleSpecification,
    pub camera: Camera,
    pub attribution: Option<String>,
}

/// Constructs widgets; construction can fail, e.g. without a container
pub trait WidgetFactory {
    type Widget: MapWidget;

    fn create(&mut self, options: MountOptions) -> Result<Self::Widget>;
}

/// Inputs the widget was last brought in line with
#[derive(Debug, Clone, PartialEq)]
struct Applied {
    source: MapSource,
    style: BasemapStyle,
    airport: Option<String>,
    selection: u64,
}

impl Applied {
    fn from_store(store: &ViewState) -> Self {
        Self {
            source: store.map_source(),
            style: store.map_style(),
            airport: store.selected_airport().map(|a| a.code.clone()),
            selection: store.selection_generation(),
        }
    }
}

enum AdapterState<W> {
    Uninitialized,
    Ready { widget: W, applied: Applied },
}

pub struct MapViewAdapter<W: MapWidget> {
    state: AdapterState<W>,
    styles: StyleBuilder,
    bearing_offset: f64,
    transition: CameraTransition,
}

impl<W: MapWidget> MapViewAdapter<W> {
    pub fn new(config: &ViewerConfig) -> Self {
        Self {
            state: AdapterState::Uninitialized,
            styles: StyleBuilder::new(config.credentials.clone()),
            bearing_offset: config.bearing_offset,
            transition: config.camera_transition,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, AdapterState::Ready { .. })
    }

    pub fn widget(&self) -> Option<&W> {
        match &self.state {
            AdapterState::Ready { widget, .. } => Some(widget),
            AdapterState::Uninitialized => None,
        }
    }

    pub fn widget_mut(&mut self) -> Option<&mut W> {
        match &mut self.state {
            AdapterState::Ready { widget, .. } => Some(widget),
            AdapterState::Uninitialized => None,
        }
    }

    /// Style the store currently asks for
    pub fn current_style(&self, store: &ViewState) -> StyleSpecification {
        self.styles.build(store.map_source(), store.map_style())
    }

    /// Camera the store asks for: the selected airport when there is one,
    /// otherwise the stored camera. Bearing is shifted by the configured
    /// offset in both cases.
    pub fn target_camera(&self, store: &ViewState) -> Camera {
        match store.selected_airport() {
            Some(airport) => Camera::new(
                airport.location,
                airport.default_zoom,
                airport.rotation_or_default() + self.bearing_offset,
            ),
            None => Camera::new(store.center(), store.zoom(), self.bearing_offset),
        }
    }

    /// Constructs the widget on first mount. Returns whether the adapter is
    /// ready afterwards; failures are logged and leave it uninitialized.
    pub fn mount<F>(&mut self, factory: &mut F, store: &ViewState) -> bool
    where
        F: WidgetFactory<Widget = W>,
    {
        if self.is_ready() {
            log::debug!("map widget already mounted");
            return true;
        }

        let style = self.current_style(store);
        let options = MountOptions {
            attribution: style.attribution().map(str::to_string),
            camera: self.target_camera(store),
            style,
        };

        match factory.create(options) {
            Ok(widget) => {
                log::info!(
                    "map widget mounted with {}/{} basemap",
                    store.map_source(),
                    store.map_style()
                );
                self.state = AdapterState::Ready {
                    widget,
                    applied: Applied::from_store(store),
                };
                true
            }
            Err(e) => {
                log::warn!("map widget construction failed: {e}");
                false
            }
        }
    }

    /// Brings a mounted widget in line with `store`. Never reconstructs.
    pub fn reconcile(&mut self, store: &ViewState) {
        let target_camera = self.target_camera(store);
        let duration = self.transition.duration();

        let AdapterState::Ready { widget, applied } = &mut self.state else {
            return;
        };
        let wanted = Applied::from_store(store);

        if wanted.source != applied.source || wanted.style != applied.style {
            let style = self.styles.build(wanted.source, wanted.style);
            log::info!("switching basemap to {}/{}", wanted.source, wanted.style);
            let attribution = style.attribution().map(str::to_string);
            widget.set_style(style);
            widget.set_attribution(attribution);
        }

        if wanted.airport != applied.airport || wanted.selection != applied.selection {
            if let Some(code) = &wanted.airport {
                log::debug!("moving camera to airport {code}");
                if duration.is_zero() {
                    widget.jump_to(target_camera);
                } else {
                    widget.fly_to(target_camera, duration);
                }
            }
        }

        *applied = wanted;
    }

    /// Applies one widget notification. Only a settled move reaches the
    /// store; returns whether it did.
    pub fn handle_widget_event(&self, event: WidgetEvent, store: &mut ViewState) -> bool {
        let AdapterState::Ready { widget, .. } = &self.state else {
            return false;
        };

        match event {
            WidgetEvent::MoveEnd(_) => {
                let camera = widget.camera();
                log::debug!(
                    "camera settled at {:.6},{:.6} z{:.2} bearing {:.1}",
                    camera.center.lng,
                    camera.center.lat,
                    camera.zoom,
                    camera.bearing
                );
                store.apply(ViewEvent::camera_changed(&camera));
                true
            }
            WidgetEvent::MoveStart | WidgetEvent::Move(_) => false,
        }
    }

    /// Drains the widget's pending notifications into the store
    pub fn pump(&mut self, store: &mut ViewState) -> usize {
        let events = match self.widget_mut() {
            Some(widget) => widget.poll_events(),
            None => return 0,
        };

        events
            .into_iter()
            .filter(|event| self.handle_widget_event(*event, store))
            .count()
    }

    /// Releases the widget; the next mount constructs a fresh one
    pub fn teardown(&mut self) {
        if let AdapterState::Ready { mut widget, .. } =
            std::mem::replace(&mut self.state, AdapterState::Uninitialized)
        {
            log::debug!("tearing down map widget");
            widget.remove();
        }
    }
}

impl<W: MapWidget> Drop for MapViewAdapter<W> {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Credentials;
    use crate::core::geo::LatLng;
    use crate::MapError;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Default)]
    struct Calls {
        created: usize,
        styles: Vec<StyleSpecification>,
        attributions: Vec<Option<String>>,
        jumps: Vec<Camera>,
        flights: Vec<(Camera, Duration)>,
        removed: usize,
    }

    struct FakeWidget {
        camera: Camera,
        events: Vec<WidgetEvent>,
        calls: Rc<RefCell<Calls>>,
    }

    impl MapWidget for FakeWidget {
        fn camera(&self) -> Camera {
            self.camera
        }

        fn jump_to(&mut self, camera: Camera) {
            self.camera = camera;
            self.calls.borrow_mut().jumps.push(camera);
        }

        fn fly_to(&mut self, camera: Camera, duration: Duration) {
            self.calls.borrow_mut().flights.push((camera, duration));
        }

        fn set_style(&mut self, style: StyleSpecification) {
            self.calls.borrow_mut().styles.push(style);
        }

        fn set_attribution(&mut self, text: Option<String>) {
            self.calls.borrow_mut().attributions.push(text);
        }

        fn poll_events(&mut self) -> Vec<WidgetEvent> {
            std::mem::take(&mut self.events)
        }

        fn remove(&mut self) {
            self.calls.borrow_mut().removed += 1;
        }
    }

    struct FakeFactory {
        fail: bool,
        mounted: Option<MountOptions>,
        calls: Rc<RefCell<Calls>>,
    }

    impl FakeFactory {
        fn new() -> Self {
            Self {
                fail: false,
                mounted: None,
                calls: Rc::new(RefCell::new(Calls::default())),
            }
        }
    }

    impl WidgetFactory for FakeFactory {
        type Widget = FakeWidget;

        fn create(&mut self, options: MountOptions) -> Result<FakeWidget> {
            if self.fail {
                return Err(MapError::Mount("container not mounted".to_string()));
            }
            self.calls.borrow_mut().created += 1;
            self.mounted = Some(options.clone());
            Ok(FakeWidget {
                camera: options.camera,
                events: Vec::new(),
                calls: Rc::clone(&self.calls),
            })
        }
    }

    fn jump_config() -> ViewerConfig {
        ViewerConfig::for_testing()
    }

    #[test]
    fn test_mount_uses_store_style_and_airport_camera() {
        let store = ViewState::default();
        let mut factory = FakeFactory::new();
        let mut adapter = MapViewAdapter::new(&jump_config());

        assert!(adapter.mount(&mut factory, &store));
        assert!(adapter.is_ready());

        let mounted = factory.mounted.clone().unwrap();
        assert_eq!(mounted.style.layers[0].source, "gaode-vec");
        assert_eq!(mounted.attribution.as_deref(), Some("© 2024 AutoNavi"));
        assert_eq!(mounted.camera.center, store.center());
        assert_eq!(mounted.camera.zoom, 17.0);
        assert!((mounted.camera.bearing - (242.16 - 124.0)).abs() < 1e-9);
    }

    #[test]
    fn test_mount_without_airport_uses_store_camera() {
        let mut store = ViewState::default();
        store.set_center(LatLng::new(31.0, 121.0));
        store.set_zoom(9.5);
        store.clear_selection();

        let mut factory = FakeFactory::new();
        let mut adapter = MapViewAdapter::new(&jump_config());
        assert!(adapter.mount(&mut factory, &store));

        let camera = factory.mounted.clone().unwrap().camera;
        assert_eq!(camera.center, LatLng::new(31.0, 121.0));
        assert_eq!(camera.zoom, 9.5);
        assert!((camera.bearing - 236.0).abs() < 1e-9);

        // Losing the selection does not move the widget
        adapter.reconcile(&store);
        assert!(factory.calls.borrow().jumps.is_empty());
    }

    #[test]
    fn test_mount_is_guarded() {
        let store = ViewState::default();
        let mut factory = FakeFactory::new();
        let mut adapter = MapViewAdapter::new(&jump_config());

        assert!(adapter.mount(&mut factory, &store));
        assert!(adapter.mount(&mut factory, &store));
        assert_eq!(factory.calls.borrow().created, 1);
    }

    #[test]
    fn test_mount_failure_stays_uninitialized() {
        let mut store = ViewState::default();
        let mut factory = FakeFactory::new();
        factory.fail = true;
        let mut adapter = MapViewAdapter::new(&jump_config());

        assert!(!adapter.mount(&mut factory, &store));
        assert!(!adapter.is_ready());

        // Reconciling and pumping an unmounted adapter is harmless
        store.set_map_source(MapSource::Osm);
        adapter.reconcile(&store);
        assert_eq!(adapter.pump(&mut store), 0);

        factory.fail = false;
        assert!(adapter.mount(&mut factory, &store));
        assert_eq!(
            factory.mounted.unwrap().style.layers[0].source,
            "osm"
        );
    }

    #[test]
    fn test_source_and_style_changes_restyle_without_remount() {
        let mut store = ViewState::default();
        let mut factory = FakeFactory::new();
        let mut adapter = MapViewAdapter::new(&jump_config());
        adapter.mount(&mut factory, &store);

        adapter.reconcile(&store);
        assert!(factory.calls.borrow().styles.is_empty());

        store.set_map_source(MapSource::Osm);
        adapter.reconcile(&store);
        store.set_map_style(BasemapStyle::Satellite);
        adapter.reconcile(&store);

        let calls = factory.calls.borrow();
        assert_eq!(calls.created, 1);
        assert_eq!(calls.styles.len(), 2);
        assert_eq!(calls.styles[0].layers[0].source, "osm");
        assert_eq!(calls.styles[1].layers[0].source, "osm-satellite");
        assert_eq!(
            calls.attributions,
            vec![
                Some("© OpenStreetMap contributors".to_string()),
                Some("© Esri".to_string())
            ]
        );
        assert!(calls.jumps.is_empty());
    }

    #[test]
    fn test_tianditu_without_key_restyles_to_osm() {
        let mut store = ViewState::default();
        let mut factory = FakeFactory::new();
        let config = ViewerConfig {
            credentials: Credentials::none(),
            ..jump_config()
        };
        let mut adapter = MapViewAdapter::new(&config);
        adapter.mount(&mut factory, &store);

        store.set_map_source(MapSource::Tianditu);
        adapter.reconcile(&store);

        assert_eq!(factory.calls.borrow().styles[0].layers[0].source, "osm");
    }

    #[test]
    fn test_airport_selection_moves_camera() {
        let mut store = ViewState::default();
        let mut factory = FakeFactory::new();
        let mut adapter = MapViewAdapter::new(&jump_config());
        adapter.mount(&mut factory, &store);

        assert!(store.select_airport("PVG"));
        adapter.reconcile(&store);

        let calls = factory.calls.borrow();
        assert_eq!(calls.jumps.len(), 1);
        let camera = calls.jumps[0];
        assert_eq!(camera.center, LatLng::new(31.1443, 121.8053));
        assert_eq!(camera.zoom, 15.0);
        assert!((camera.bearing - 236.0).abs() < 1e-9);
        assert!(calls.styles.is_empty());
    }

    #[test]
    fn test_reselecting_same_airport_moves_again() {
        let mut store = ViewState::default();
        let mut factory = FakeFactory::new();
        let mut adapter = MapViewAdapter::new(&jump_config());
        adapter.mount(&mut factory, &store);

        store.select_airport("WNZ");
        adapter.reconcile(&store);
        adapter.reconcile(&store);

        assert_eq!(factory.calls.borrow().jumps.len(), 1);
    }

    #[test]
    fn test_fly_transition() {
        let mut store = ViewState::default();
        let mut factory = FakeFactory::new();
        let config = ViewerConfig {
            camera_transition: CameraTransition::Fly { duration_ms: 750 },
            ..ViewerConfig::default()
        };
        let mut adapter = MapViewAdapter::new(&config);
        adapter.mount(&mut factory, &store);

        store.select_airport("MFM");
        adapter.reconcile(&store);

        let calls = factory.calls.borrow();
        assert!(calls.jumps.is_empty());
        assert_eq!(calls.flights.len(), 1);
        assert_eq!(calls.flights[0].1, Duration::from_millis(750));
    }

    #[test]
    fn test_only_move_end_writes_camera_back() {
        let mut store = ViewState::default();
        let mut factory = FakeFactory::new();
        let mut adapter = MapViewAdapter::new(&jump_config());
        adapter.mount(&mut factory, &store);

        let panned = Camera::new(LatLng::new(28.0, 121.0), 14.25, 30.0);
        {
            let widget = adapter.widget_mut().unwrap();
            widget.camera = panned;
            widget.events = vec![
                WidgetEvent::MoveStart,
                WidgetEvent::Move(panned),
                WidgetEvent::Move(panned),
            ];
        }
        let before = store.clone();
        assert_eq!(adapter.pump(&mut store), 0);
        assert_eq!(store, before);

        adapter
            .widget_mut()
            .unwrap()
            .events
            .push(WidgetEvent::MoveEnd(panned));
        assert_eq!(adapter.pump(&mut store), 1);

        assert_eq!(store.center(), LatLng::new(28.0, 121.0));
        assert_eq!(store.zoom(), 14.25);
        assert_eq!(store.rotation(), 30.0);
        assert_eq!(store.selected_airport().unwrap().code, "WNZ");
    }

    #[test]
    fn test_teardown_releases_widget() {
        let store = ViewState::default();
        let mut factory = FakeFactory::new();
        let calls = Rc::clone(&factory.calls);
        {
            let mut adapter = MapViewAdapter::new(&jump_config());
            adapter.mount(&mut factory, &store);
            adapter.teardown();
            assert!(!adapter.is_ready());
            assert_eq!(calls.borrow().removed, 1);

            adapter.mount(&mut factory, &store);
        }
        // Dropping a mounted adapter tears it down too
        assert_eq!(calls.borrow().created, 2);
        assert_eq!(calls.borrow().removed, 2);
    }
}
