pub mod airports;
pub mod camera;
pub mod config;
pub mod geo;
pub mod state;
