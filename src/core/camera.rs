use crate::core::geo::{LatLng, Point, TileCoord, EARTH_RADIUS};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Pixel size of one raster tile
pub const TILE_SIZE: f64 = 256.0;

/// Camera of the map widget: where it looks, how close, and its heading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub center: LatLng,
    pub zoom: f64,
    /// Heading in degrees, clockwise from north
    pub bearing: f64,
}

impl Camera {
    pub fn new(center: LatLng, zoom: f64, bearing: f64) -> Self {
        Self {
            center,
            zoom,
            bearing: normalize_bearing(bearing),
        }
    }

    /// Linear interpolation towards `target`; bearing turns the short way round
    pub fn lerp(&self, target: &Camera, t: f64) -> Camera {
        let t = t.clamp(0.0, 1.0);
        let mut delta_bearing = normalize_bearing(target.bearing - self.bearing);
        if delta_bearing > 180.0 {
            delta_bearing -= 360.0;
        }
        Camera::new(
            LatLng::new(
                self.center.lat + (target.center.lat - self.center.lat) * t,
                self.center.lng + (target.center.lng - self.center.lng) * t,
            ),
            self.zoom + (target.zoom - self.zoom) * t,
            self.bearing + delta_bearing * t,
        )
    }

    /// Ground distance covered by one screen pixel at the camera center
    pub fn meters_per_pixel(&self) -> f64 {
        let world = 2.0 * PI * EARTH_RADIUS;
        world * self.center.lat.to_radians().cos() / (TILE_SIZE * 2_f64.powf(self.zoom))
    }

    /// Offset of `world` (pixels at the camera zoom) from the view center,
    /// rotated into screen orientation
    pub fn world_to_screen_offset(&self, world: Point) -> Point {
        let center = project(&self.center, self.zoom);
        world.subtract(&center).rotate(-self.bearing)
    }

    /// Inverse of [`Camera::world_to_screen_offset`]
    pub fn screen_offset_to_lat_lng(&self, offset: Point) -> LatLng {
        let center = project(&self.center, self.zoom);
        unproject(&center.add(&offset.rotate(self.bearing)), self.zoom)
    }

    /// Tiles at integer zoom `z` that can intersect a `width` x `height`
    /// view, at any bearing. Grid positions are unwrapped so a tile repeated
    /// across the antimeridian gets one placement per copy.
    pub fn covering_tiles(&self, width: f64, height: f64, z: u8) -> Vec<TilePlacement> {
        let scale = 2_f64.powf(self.zoom - z as f64);
        let center = project(&self.center, z as f64);
        let radius = (width * width + height * height).sqrt() / 2.0 / scale;

        let min_x = ((center.x - radius) / TILE_SIZE).floor() as i64;
        let max_x = ((center.x + radius) / TILE_SIZE).floor() as i64;
        let min_y = ((center.y - radius) / TILE_SIZE).floor() as i64;
        let max_y = ((center.y + radius) / TILE_SIZE).floor() as i64;

        let mut tiles = Vec::new();
        for grid_y in min_y..=max_y {
            for grid_x in min_x..=max_x {
                if let Some(coord) = TileCoord::wrapped(grid_x, grid_y, z) {
                    tiles.push(TilePlacement {
                        coord,
                        grid_x,
                        grid_y,
                    });
                }
            }
        }
        tiles
    }
}

/// A tile and the unwrapped grid cell it is drawn in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TilePlacement {
    pub coord: TileCoord,
    pub grid_x: i64,
    pub grid_y: i64,
}

impl TilePlacement {
    /// World pixel position of the tile's top-left corner at its own zoom
    pub fn origin(&self) -> Point {
        Point::new(self.grid_x as f64 * TILE_SIZE, self.grid_y as f64 * TILE_SIZE)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(LatLng::default(), 0.0, 0.0)
    }
}

/// Maps a bearing to [0, 360)
pub fn normalize_bearing(bearing: f64) -> f64 {
    let b = bearing % 360.0;
    if b < 0.0 {
        b + 360.0
    } else {
        b
    }
}

/// Projects a LatLng to world pixel coordinates at `zoom` (EPSG:3857)
pub fn project(lat_lng: &LatLng, zoom: f64) -> Point {
    let scale = TILE_SIZE * 2_f64.powf(zoom);
    let lat = LatLng::clamp_lat(lat_lng.lat).to_radians();

    let x = (lat_lng.lng + 180.0) / 360.0 * scale;
    let y = (1.0 - (PI / 4.0 + lat / 2.0).tan().ln() / PI) / 2.0 * scale;
    Point::new(x, y)
}

/// Unprojects world pixel coordinates at `zoom` back to a LatLng
pub fn unproject(pixel: &Point, zoom: f64) -> LatLng {
    let scale = TILE_SIZE * 2_f64.powf(zoom);

    let lng = pixel.x / scale * 360.0 - 180.0;
    let n = PI * (1.0 - 2.0 * pixel.y / scale);
    let lat = n.sinh().atan().to_degrees();
    LatLng::new(lat, LatLng::wrap_lng(lng))
}
