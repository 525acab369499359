pub mod events;

pub use events::{ViewEvent, WidgetEvent};
