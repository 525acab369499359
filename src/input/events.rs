use crate::core::camera::Camera;
use crate::core::geo::LatLng;
use crate::core::state::OverlayLayer;
use crate::style::{BasemapStyle, MapSource};

/// User or widget actions dispatched to the view state store
#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    /// The widget settled on a new camera
    CameraChanged {
        center: LatLng,
        zoom: f64,
        rotation: f64,
    },
    /// A different basemap provider was picked
    SourceSelected(MapSource),
    /// Vector/satellite switch
    StyleToggled(BasemapStyle),
    /// Airport picked by code
    AirportSelected(String),
    /// Overlay checkbox changed
    LayerToggled { layer: OverlayLayer, visible: bool },
}

impl ViewEvent {
    /// Camera feedback from the widget, bearing written as the store rotation
    pub fn camera_changed(camera: &Camera) -> Self {
        ViewEvent::CameraChanged {
            center: camera.center,
            zoom: camera.zoom,
            rotation: camera.bearing,
        }
    }
}

/// Camera notifications emitted by a map widget
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WidgetEvent {
    /// A gesture or programmatic move began
    MoveStart,
    /// Intermediate frame of a move
    Move(Camera),
    /// The move finished; the camera is settled
    MoveEnd(Camera),
}

impl WidgetEvent {
    pub fn is_move_end(&self) -> bool {
        matches!(self, WidgetEvent::MoveEnd(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_changed_from_camera() {
        let camera = Camera::new(LatLng::new(22.1, 113.5), 16.0, 165.0);
        assert_eq!(
            ViewEvent::camera_changed(&camera),
            ViewEvent::CameraChanged {
                center: LatLng::new(22.1, 113.5),
                zoom: 16.0,
                rotation: 165.0,
            }
        );
    }

    #[test]
    fn test_move_end_detection() {
        let camera = Camera::default();
        assert!(WidgetEvent::MoveEnd(camera).is_move_end());
        assert!(!WidgetEvent::Move(camera).is_move_end());
        assert!(!WidgetEvent::MoveStart.is_move_end());
    }
}
