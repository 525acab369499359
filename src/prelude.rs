//! Prelude module for common airmap types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use airmap::prelude::*;`

pub use crate::adapter::{MapViewAdapter, MapWidget, MountOptions, WidgetFactory};

pub use crate::core::{
    airports::{AirportConfig, AirportRegistry},
    camera::Camera,
    config::{CameraTransition, Credentials, ViewerConfig},
    geo::{LatLng, Point, TileCoord},
    state::{LayerVisibility, OverlayLayer, ViewState},
};

pub use crate::input::{ViewEvent, WidgetEvent};

pub use crate::style::{
    build_style, BasemapStyle, MapSource, RasterLayer, RasterSource, StyleBuilder,
    StyleSpecification,
};

pub use crate::tiles::{TileCache, TileLoader, TileSource, UrlTemplateSource};

#[cfg(feature = "egui")]
pub use crate::ui::{
    controls::MapControls,
    sidebar::Sidebar,
    widget::{EguiWidgetFactory, TileMapWidget},
};

pub use crate::{Error as MapError, Result};

pub use std::{sync::Arc, time::Duration};
