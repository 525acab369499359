//! # airmap
//!
//! Core of an airport map viewer: a registry of airports, the view state
//! store, basemap style construction for several tile providers, and the
//! adapter that keeps a map widget reconciled with the store.
//!
//! With the `egui` feature (on by default) the crate also ships a tile
//! widget, a sidebar and map controls built on egui.

pub mod adapter;
pub mod core;
pub mod input;
pub mod prelude;
pub mod style;
pub mod tiles;
#[cfg(feature = "egui")]
pub mod ui;

// Re-export public API
pub use adapter::{MapViewAdapter, MapWidget, MountOptions, WidgetFactory};
pub use core::{
    airports::{AirportConfig, AirportRegistry},
    camera::Camera,
    config::{CameraTransition, Credentials, ViewerConfig},
    geo::{LatLng, Point, TileCoord},
    state::{LayerVisibility, OverlayLayer, ViewState},
};
pub use input::{ViewEvent, WidgetEvent};
pub use style::{build_style, BasemapStyle, MapSource, StyleBuilder, StyleSpecification};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, MapError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid airport data: {0}")]
    InvalidAirport(String),

    #[error("Widget mount failed: {0}")]
    Mount(String),

    #[error("Tile error: {0}")]
    Tile(String),
}

/// Error type alias for convenience
pub type Error = MapError;
