//! egui front end: the tile widget plus the panels around it
//!
//! Panels never touch the store directly; they return [`crate::ViewEvent`]s
//! for the caller to apply.

pub mod controls;
pub mod elements;
pub mod sidebar;
pub mod style;
pub mod widget;

pub use controls::MapControls;
pub use sidebar::Sidebar;
pub use style::MapStyle;
pub use widget::{EguiWidgetFactory, TileMapWidget};
