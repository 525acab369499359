use serde::{Deserialize, Serialize};

/// WGS84 semi-major axis in metres, as used by Web Mercator
pub const EARTH_RADIUS: f64 = 6378137.0;

/// Latitude where Web Mercator turns the world into a square
const MERCATOR_MAX_LAT: f64 = 85.0511287798;

/// A WGS84 position.
///
/// Serialized the way map styles and the airport file write positions:
/// `[lng, lat]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        LatLng { lat, lng }
    }

    pub fn from_lng_lat([lng, lat]: [f64; 2]) -> Self {
        LatLng { lat, lng }
    }

    pub fn to_lng_lat(&self) -> [f64; 2] {
        [self.lng, self.lat]
    }

    /// Longitude folded back into [-180, 180]
    pub fn wrap_lng(lng: f64) -> f64 {
        let folded = (lng + 180.0).rem_euclid(360.0) - 180.0;
        if folded == -180.0 && lng > 0.0 {
            180.0
        } else {
            folded
        }
    }

    pub fn clamp_lat(lat: f64) -> f64 {
        lat.clamp(-MERCATOR_MAX_LAT, MERCATOR_MAX_LAT)
    }
}

impl From<[f64; 2]> for LatLng {
    fn from(pair: [f64; 2]) -> Self {
        LatLng::from_lng_lat(pair)
    }
}

impl From<LatLng> for [f64; 2] {
    fn from(position: LatLng) -> Self {
        position.to_lng_lat()
    }
}

/// Screen or world-pixel vector; y grows downwards
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    pub fn add(&self, other: &Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }

    pub fn subtract(&self, other: &Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }

    pub fn multiply(&self, factor: f64) -> Point {
        Point::new(self.x * factor, self.y * factor)
    }

    /// Turns the vector by `degrees` about the origin. With y pointing down a
    /// positive angle turns clockwise on screen.
    pub fn rotate(&self, degrees: f64) -> Point {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Point::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }
}

/// Address of one raster tile: column, row, zoom
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileCoord {
    pub x: u32,
    pub y: u32,
    pub z: u8,
}

impl TileCoord {
    pub fn new(x: u32, y: u32, z: u8) -> Self {
        TileCoord { x, y, z }
    }

    /// Builds a tile from possibly out-of-range grid indices: x wraps around
    /// the antimeridian, y outside the world yields `None`.
    pub fn wrapped(x: i64, y: i64, z: u8) -> Option<Self> {
        let n = 1_i64 << z;
        if !(0..n).contains(&y) {
            return None;
        }
        Some(TileCoord::new(x.rem_euclid(n) as u32, y as u32, z))
    }

    /// Whether the tile exists at its zoom level
    pub fn is_valid(&self) -> bool {
        let n = 1_u64 << self.z;
        (self.x as u64) < n && (self.y as u64) < n
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lat_lng_serializes_as_lng_lat_pair() {
        let coord = LatLng::new(27.908917928544973, 120.84804469204668);
        let json = serde_json::to_string(&coord).unwrap();
        assert_eq!(json, "[120.84804469204668,27.908917928544973]");

        let back: LatLng = serde_json::from_str(&json).unwrap();
        assert_eq!(back, coord);
    }

    #[test]
    fn test_wrap_lng() {
        assert_eq!(LatLng::wrap_lng(121.8), 121.8);
        assert_eq!(LatLng::wrap_lng(190.0), -170.0);
        assert_eq!(LatLng::wrap_lng(-190.0), 170.0);
        assert_eq!(LatLng::wrap_lng(180.0), 180.0);
        assert_eq!(LatLng::wrap_lng(-180.0), -180.0);
    }

    #[test]
    fn test_clamp_lat_to_mercator_range() {
        assert_eq!(LatLng::clamp_lat(45.6), 45.6);
        assert!(LatLng::clamp_lat(90.0) < 85.06);
        assert!(LatLng::clamp_lat(-90.0) > -85.06);
    }

    #[test]
    fn test_wrapped_tile_coords() {
        assert_eq!(TileCoord::wrapped(-1, 0, 2), Some(TileCoord::new(3, 0, 2)));
        assert_eq!(TileCoord::wrapped(4, 1, 2), Some(TileCoord::new(0, 1, 2)));
        assert_eq!(TileCoord::wrapped(0, 4, 2), None);
        assert_eq!(TileCoord::wrapped(0, -1, 2), None);
        assert!(!TileCoord::new(4, 0, 2).is_valid());
    }

    #[test]
    fn test_point_rotation() {
        let p = Point::new(1.0, 0.0).rotate(90.0);
        assert!(p.x.abs() < 1e-9);
        assert!((p.y - 1.0).abs() < 1e-9);

        let back = p.rotate(-90.0);
        assert!((back.x - 1.0).abs() < 1e-9);
    }
}
