use crate::core::state::{OverlayLayer, ViewState};
use crate::input::events::ViewEvent;
use egui::{Align2, Context, Id, ScrollArea};

/// Collapsible left panel listing the airports and the overlay layer toggles
#[derive(Debug, Clone)]
pub struct Sidebar {
    pub expanded: bool,
    pub width: f32,
}

impl Sidebar {
    pub fn new() -> Self {
        Self {
            expanded: true,
            width: 220.0,
        }
    }

    pub fn toggle(&mut self) {
        self.expanded = !self.expanded;
    }

    /// Draws the panel and returns the events the user produced this frame
    pub fn show(&mut self, ctx: &Context, state: &ViewState) -> Vec<ViewEvent> {
        let mut events = Vec::new();
        let mut toggle = false;

        egui::SidePanel::left("airmap-sidebar")
            .resizable(false)
            .exact_width(self.width)
            .show_animated(ctx, self.expanded, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("Airports");
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.small_button("«").on_hover_text("Hide sidebar").clicked() {
                            toggle = true;
                        }
                    });
                });
                ui.separator();

                ScrollArea::vertical()
                    .max_height(ui.available_height() * 0.6)
                    .show(ui, |ui| {
                        let selected = state.selected_airport().map(|a| a.code.as_str());
                        for airport in state.registry().iter() {
                            let label = format!("{} ({})", airport.name, airport.code);
                            let is_selected = selected == Some(airport.code.as_str());
                            if ui.selectable_label(is_selected, label).clicked() {
                                events.push(ViewEvent::AirportSelected(airport.code.clone()));
                            }
                        }
                    });

                ui.add_space(8.0);
                ui.heading("Layers");
                ui.separator();
                for layer in OverlayLayer::ALL {
                    let mut visible = state.is_layer_visible(layer);
                    if ui.checkbox(&mut visible, layer.label()).changed() {
                        events.push(ViewEvent::LayerToggled { layer, visible });
                    }
                }
            });

        if !self.expanded {
            egui::Area::new(Id::new("airmap-sidebar-open"))
                .anchor(Align2::LEFT_TOP, [10.0, 10.0])
                .show(ctx, |ui| {
                    if ui.button("»").on_hover_text("Show sidebar").clicked() {
                        toggle = true;
                    }
                });
        }

        if toggle {
            self.toggle();
        }
        events
    }
}

impl Default for Sidebar {
    fn default() -> Self {
        Self::new()
    }
}
