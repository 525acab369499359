//! Viewer configuration
//!
//! Settings come from presets or the environment. Anything that fails to
//! parse is logged and left at its default, so a bad variable never keeps the
//! viewer from starting.

use crate::core::airports::DEFAULT_AIRPORT_CODE;
use crate::style::{BasemapStyle, MapSource};
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable holding the Tianditu access key
pub const TIANDITU_KEY_VAR: &str = "AIRMAP_TIANDITU_KEY";
const LEGACY_TIANDITU_KEY_VAR: &str = "TIANDITU_KEY";
const MAP_SOURCE_VAR: &str = "AIRMAP_MAP_SOURCE";
const MAP_STYLE_VAR: &str = "AIRMAP_MAP_STYLE";
const AIRPORTS_VAR: &str = "AIRMAP_AIRPORTS";
const CAMERA_TRANSITION_VAR: &str = "AIRMAP_CAMERA_TRANSITION";

/// Offset between an airport's stored rotation and the widget bearing
pub const DEFAULT_BEARING_OFFSET: f64 = -124.0;

/// Access keys for tile providers that need one
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    tianditu_key: Option<String>,
}

impl Credentials {
    pub fn none() -> Self {
        Self::default()
    }

    /// Sets the Tianditu key; blank keys count as absent
    pub fn with_tianditu_key(mut self, key: impl Into<String>) -> Self {
        let key = key.into();
        self.tianditu_key = if key.trim().is_empty() {
            None
        } else {
            Some(key.trim().to_string())
        };
        self
    }

    pub fn tianditu_key(&self) -> Option<&str> {
        self.tianditu_key.as_deref()
    }
}

/// How the camera moves when a different airport is selected
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraTransition {
    /// Set the camera immediately
    Jump,
    /// Animate to the target
    Fly { duration_ms: u64 },
}

impl CameraTransition {
    pub fn duration(&self) -> Duration {
        match self {
            CameraTransition::Jump => Duration::ZERO,
            CameraTransition::Fly { duration_ms } => Duration::from_millis(*duration_ms),
        }
    }
}

impl Default for CameraTransition {
    fn default() -> Self {
        CameraTransition::Fly { duration_ms: 1000 }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    pub credentials: Credentials,
    pub initial_source: MapSource,
    pub initial_style: BasemapStyle,
    /// Airport selected at startup; the first registry entry if missing
    pub default_airport: String,
    pub bearing_offset: f64,
    pub camera_transition: CameraTransition,
    /// Decoded tile textures kept by the widget
    pub tile_cache_size: usize,
    /// JSON airport list replacing the built-in table
    pub airports_path: Option<PathBuf>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            credentials: Credentials::none(),
            initial_source: MapSource::Gaode,
            initial_style: BasemapStyle::Vector,
            default_airport: DEFAULT_AIRPORT_CODE.to_string(),
            bearing_offset: DEFAULT_BEARING_OFFSET,
            camera_transition: CameraTransition::default(),
            tile_cache_size: 512,
            airports_path: None,
        }
    }
}

impl ViewerConfig {
    /// Immediate camera moves and a small cache, for tests and headless use
    pub fn for_testing() -> Self {
        Self {
            camera_transition: CameraTransition::Jump,
            tile_cache_size: 16,
            ..Default::default()
        }
    }

    /// Defaults overridden by `AIRMAP_*` environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`ViewerConfig::from_env`] with an injectable variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(key) = lookup(TIANDITU_KEY_VAR).or_else(|| lookup(LEGACY_TIANDITU_KEY_VAR)) {
            config.credentials = config.credentials.with_tianditu_key(key);
        }

        if let Some(value) = lookup(MAP_SOURCE_VAR) {
            match value.parse() {
                Ok(source) => config.initial_source = source,
                Err(e) => log::warn!("ignoring {MAP_SOURCE_VAR}: {e}"),
            }
        }

        if let Some(value) = lookup(MAP_STYLE_VAR) {
            match value.parse() {
                Ok(style) => config.initial_style = style,
                Err(e) => log::warn!("ignoring {MAP_STYLE_VAR}: {e}"),
            }
        }

        if let Some(path) = lookup(AIRPORTS_VAR).filter(|p| !p.trim().is_empty()) {
            config.airports_path = Some(PathBuf::from(path));
        }

        if let Some(value) = lookup(CAMERA_TRANSITION_VAR) {
            match value.trim().to_ascii_lowercase().as_str() {
                "jump" => config.camera_transition = CameraTransition::Jump,
                "fly" => config.camera_transition = CameraTransition::default(),
                other => log::warn!("ignoring {CAMERA_TRANSITION_VAR}: unknown transition {other}"),
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fxhash::FxHashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: FxHashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ViewerConfig::default();
        assert_eq!(config.initial_source, MapSource::Gaode);
        assert_eq!(config.initial_style, BasemapStyle::Vector);
        assert_eq!(config.default_airport, "WNZ");
        assert_eq!(config.bearing_offset, -124.0);
        assert_eq!(config.credentials.tianditu_key(), None);
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = ViewerConfig::from_lookup(lookup_from(&[
            ("AIRMAP_TIANDITU_KEY", "secret"),
            ("AIRMAP_MAP_SOURCE", "google"),
            ("AIRMAP_MAP_STYLE", "satellite"),
            ("AIRMAP_AIRPORTS", "/etc/airmap/airports.json"),
            ("AIRMAP_CAMERA_TRANSITION", "jump"),
        ]));

        assert_eq!(config.credentials.tianditu_key(), Some("secret"));
        assert_eq!(config.initial_source, MapSource::Google);
        assert_eq!(config.initial_style, BasemapStyle::Satellite);
        assert_eq!(
            config.airports_path,
            Some(PathBuf::from("/etc/airmap/airports.json"))
        );
        assert_eq!(config.camera_transition, CameraTransition::Jump);
    }

    #[test]
    fn test_legacy_key_and_bad_values() {
        let config = ViewerConfig::from_lookup(lookup_from(&[
            ("TIANDITU_KEY", "legacy"),
            ("AIRMAP_MAP_SOURCE", "bing"),
            ("AIRMAP_CAMERA_TRANSITION", "teleport"),
        ]));

        assert_eq!(config.credentials.tianditu_key(), Some("legacy"));
        assert_eq!(config.initial_source, MapSource::Gaode);
        assert_eq!(config.camera_transition, CameraTransition::default());
    }

    #[test]
    fn test_blank_key_is_absent() {
        let credentials = Credentials::none().with_tianditu_key("   ");
        assert_eq!(credentials.tianditu_key(), None);
    }
}
