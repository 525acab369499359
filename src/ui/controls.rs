use crate::core::state::ViewState;
use crate::input::events::ViewEvent;
use crate::style::{BasemapStyle, MapSource};
use egui::{Align2, ComboBox, Context, Frame, Id, RichText};

/// Basemap source selector, vector/satellite toggle and zoom readout,
/// floating over the top-right corner of the map.
///
/// The controls hold no state of their own: they read the store and answer
/// with the events a user interaction produced.
#[derive(Debug, Clone)]
pub struct MapControls {
    pub visible: bool,
    pub offset: [f32; 2],
}

impl MapControls {
    pub fn new() -> Self {
        Self {
            visible: true,
            offset: [-10.0, 10.0],
        }
    }

    pub fn show(&self, ctx: &Context, state: &ViewState) -> Vec<ViewEvent> {
        let mut events = Vec::new();
        if !self.visible {
            return events;
        }

        egui::Area::new(Id::new("airmap-controls"))
            .anchor(Align2::RIGHT_TOP, self.offset)
            .show(ctx, |ui| {
                Frame::popup(ui.style()).show(ui, |ui| {
                    ui.horizontal(|ui| {
                        let mut source = state.map_source();
                        ComboBox::from_id_source("airmap-map-source")
                            .selected_text(source.label())
                            .show_ui(ui, |ui| {
                                for candidate in MapSource::ALL {
                                    ui.selectable_value(&mut source, candidate, candidate.label());
                                }
                            });
                        if source != state.map_source() {
                            events.push(ViewEvent::SourceSelected(source));
                        }

                        let style = state.map_style();
                        let label = match style {
                            BasemapStyle::Vector => "Satellite",
                            BasemapStyle::Satellite => "Vector",
                        };
                        if ui.button(label).clicked() {
                            events.push(ViewEvent::StyleToggled(style.toggled()));
                        }
                    });
                    ui.label(RichText::new(zoom_label(state.zoom())).monospace());
                });
            });

        events
    }
}

impl Default for MapControls {
    fn default() -> Self {
        Self::new()
    }
}

pub fn zoom_label(zoom: f64) -> String {
    format!("Zoom: {zoom:.2}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zoom_label() {
        assert_eq!(zoom_label(17.0), "Zoom: 17.00");
        assert_eq!(zoom_label(15.456), "Zoom: 15.46");
    }

    #[test]
    fn test_idle_frame_emits_nothing() {
        let ctx = Context::default();
        let state = ViewState::default();
        let controls = MapControls::new();

        let mut events = Vec::new();
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            events = controls.show(ctx, &state);
        });
        assert!(events.is_empty());
    }
}
