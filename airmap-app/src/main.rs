use airmap::ui::{EguiWidgetFactory, MapControls, Sidebar, TileMapWidget};
use airmap::{AirportRegistry, MapViewAdapter, ViewEvent, ViewState, ViewerConfig};
use std::sync::Arc;

/// Airport map viewer application
fn main() -> Result<(), eframe::Error> {
    env_logger::init();

    let config = ViewerConfig::from_env();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_title("Airport Map"),
        ..Default::default()
    };

    eframe::run_native(
        "airmap-app",
        options,
        Box::new(move |_cc| Box::new(AirmapApp::new(config))),
    )
}

fn load_registry(config: &ViewerConfig) -> AirportRegistry {
    let Some(path) = &config.airports_path else {
        return AirportRegistry::builtin();
    };

    match AirportRegistry::load(path) {
        Ok(registry) => registry,
        Err(e) => {
            log::error!("failed to load airports from {}: {e}", path.display());
            AirportRegistry::builtin()
        }
    }
}

/// The main application struct
struct AirmapApp {
    config: ViewerConfig,
    state: ViewState,
    adapter: MapViewAdapter<TileMapWidget>,
    sidebar: Sidebar,
    controls: MapControls,
}

impl AirmapApp {
    fn new(config: ViewerConfig) -> Self {
        let registry = Arc::new(load_registry(&config));
        let state = ViewState::with_config(registry, &config);
        let adapter = MapViewAdapter::new(&config);

        Self {
            config,
            state,
            adapter,
            sidebar: Sidebar::new(),
            controls: MapControls::new(),
        }
    }

    fn apply_all(&mut self, events: Vec<ViewEvent>) {
        for event in events {
            log::debug!("view event {event:?}");
            self.state.apply(event);
        }
    }
}

impl eframe::App for AirmapApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut factory =
            EguiWidgetFactory::new(Some(ctx.clone()), self.config.tile_cache_size);
        self.adapter.mount(&mut factory, &self.state);

        let events = self.sidebar.show(ctx, &self.state);
        self.apply_all(events);
        self.adapter.reconcile(&self.state);

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                if let Some(widget) = self.adapter.widget_mut() {
                    widget.show(ui);
                }
            });

        // Overlay areas go last so they stay above the map
        let events = self.controls.show(ctx, &self.state);
        self.apply_all(events);
        self.adapter.reconcile(&self.state);

        self.adapter.pump(&mut self.state);
    }
}
