//! Raster tile map widget for egui.
//!
//! [`TileMapWidget`] is the concrete [`MapWidget`] the viewer mounts. It keeps
//! its own camera, draws the basemap layer of the current style as rotated
//! textured quads, and reports camera movement as [`WidgetEvent`]s.

use crate::adapter::{MapWidget, MountOptions, WidgetFactory};
use crate::core::camera::{normalize_bearing, project, unproject, Camera, TILE_SIZE};
use crate::core::geo::Point;
use crate::input::events::WidgetEvent;
use crate::style::StyleSpecification;
use crate::tiles::{TileCache, TileLoader, TileResult, TileSource, UrlTemplateSource};
use crate::ui::elements::{
    paint_attribution, paint_scale_bar, NavigationAction, NavigationControl, Position,
};
use crate::ui::style::MapStyle;
use crate::{MapError, Result};
use egui::epaint::Vertex;
use egui::{
    Color32, ColorImage, Mesh, Pos2, Rect, Response, Sense, Shape, TextureHandle, TextureOptions,
    Ui, Vec2,
};
use instant::Instant;
use std::time::Duration;

pub const MIN_ZOOM: f64 = 0.0;
pub const MAX_ZOOM: f64 = 22.0;

/// Scroll gestures settle once no wheel input arrived for this long
const SCROLL_SETTLE: Duration = Duration::from_millis(250);
/// Duration of zoom and compass button animations
const BUTTON_ANIMATION: Duration = Duration::from_millis(300);
/// Degrees of rotation per point of horizontal secondary-button drag
const ROTATE_SPEED: f64 = 0.5;
const MAX_TILES_IN_FLIGHT: usize = 16;

#[derive(Debug, Clone, Copy)]
struct Flight {
    from: Camera,
    to: Camera,
    start: Instant,
    duration: Duration,
}

impl Flight {
    /// Eased progress in [0, 1]
    fn progress(&self, now: Instant) -> f64 {
        let t = now.duration_since(self.start).as_secs_f64() / self.duration.as_secs_f64();
        ease_in_out(t.clamp(0.0, 1.0))
    }
}

fn ease_in_out(t: f64) -> f64 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// User interaction in progress
#[derive(Debug, Clone, Copy, PartialEq)]
enum Gesture {
    Drag,
    Scroll { last: Instant },
}

pub struct TileMapWidget {
    ctx: egui::Context,
    camera: Camera,
    style: Option<StyleSpecification>,
    source: Option<UrlTemplateSource>,
    attribution: Option<String>,
    flight: Option<Flight>,
    gesture: Option<Gesture>,
    events: Vec<WidgetEvent>,
    textures: TileCache<TextureHandle>,
    loader: TileLoader,
    navigation: NavigationControl,
    map_style: MapStyle,
}

impl TileMapWidget {
    pub fn new(ctx: egui::Context, options: MountOptions, tile_cache_size: usize) -> Self {
        let mut widget = Self {
            ctx,
            camera: clamp_zoom(options.camera),
            style: None,
            source: None,
            attribution: options.attribution,
            flight: None,
            gesture: None,
            events: Vec::new(),
            textures: TileCache::new(tile_cache_size),
            loader: TileLoader::new(MAX_TILES_IN_FLIGHT),
            navigation: NavigationControl::new(Position::RightCenter),
            map_style: MapStyle::default(),
        };
        widget.set_style(options.style);
        widget
    }

    pub fn style(&self) -> Option<&StyleSpecification> {
        self.style.as_ref()
    }

    pub fn attribution(&self) -> Option<&str> {
        self.attribution.as_deref()
    }

    pub fn is_animating(&self) -> bool {
        self.flight.is_some()
    }

    /// Draws the map into the remaining space of `ui` and handles input
    pub fn show(&mut self, ui: &mut Ui) -> Response {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());

        self.advance_flight();
        self.handle_input(ui, rect, &response);
        self.receive_tiles();

        ui.painter()
            .rect_filled(rect, 0.0, self.map_style.background_color);
        self.paint_tiles(ui, rect);

        if let Some(action) =
            self.navigation
                .show(ui, rect, self.camera.bearing, &self.map_style.controls)
        {
            self.navigate(action);
        }
        paint_scale_bar(
            ui,
            rect,
            self.camera.meters_per_pixel(),
            &self.map_style.scale_bar,
        );
        if let Some(text) = &self.attribution {
            paint_attribution(ui, rect, text, &self.map_style.attribution);
        }

        if self.flight.is_some() {
            self.ctx.request_repaint();
        } else if self.loader.pending() > 0 || self.gesture.is_some() {
            self.ctx.request_repaint_after(Duration::from_millis(50));
        }

        response
    }

    fn start_flight(&mut self, to: Camera, duration: Duration) {
        self.begin_move();
        self.gesture = None;
        self.flight = Some(Flight {
            from: self.camera,
            to: clamp_zoom(to),
            start: Instant::now(),
            duration,
        });
        self.ctx.request_repaint();
    }

    fn advance_flight(&mut self) {
        let Some(flight) = self.flight else {
            return;
        };

        let t = flight.progress(Instant::now());
        if t >= 1.0 {
            self.camera = flight.to;
            self.flight = None;
            self.end_move();
        } else {
            self.camera = flight.from.lerp(&flight.to, t);
            self.events.push(WidgetEvent::Move(self.camera));
        }
    }

    /// Emits `MoveStart` unless a movement is already under way
    fn begin_move(&mut self) {
        if self.flight.is_none() && self.gesture.is_none() {
            self.events.push(WidgetEvent::MoveStart);
        }
    }

    fn end_move(&mut self) {
        log::trace!(
            "camera settled at {:?} zoom {:.2} bearing {:.1}",
            self.camera.center,
            self.camera.zoom,
            self.camera.bearing
        );
        self.events.push(WidgetEvent::MoveEnd(self.camera));
    }

    fn handle_input(&mut self, ui: &Ui, rect: Rect, response: &Response) {
        let pointer = response.hover_pos();

        if response.dragged_by(egui::PointerButton::Primary) {
            let delta = response.drag_delta();
            if delta != Vec2::ZERO {
                self.take_over(Gesture::Drag);
                self.camera.center = self
                    .camera
                    .screen_offset_to_lat_lng(Point::new(-delta.x as f64, -delta.y as f64));
                self.events.push(WidgetEvent::Move(self.camera));
            }
        } else if response.dragged_by(egui::PointerButton::Secondary) {
            let delta = response.drag_delta();
            if delta.x != 0.0 {
                self.take_over(Gesture::Drag);
                self.camera.bearing =
                    normalize_bearing(self.camera.bearing - delta.x as f64 * ROTATE_SPEED);
                self.events.push(WidgetEvent::Move(self.camera));
            }
        }

        if response.drag_released() && self.gesture == Some(Gesture::Drag) {
            self.gesture = None;
            self.end_move();
        }

        if response.double_clicked() {
            if let Some(pos) = pointer {
                let target = zoom_around(&self.camera, self.camera.zoom + 1.0, pos - rect.center());
                self.start_flight(target, BUTTON_ANIMATION);
            }
        }

        let scroll = ui.input(|i| i.raw_scroll_delta.y);
        if let (true, Some(pos)) = (scroll != 0.0 && response.hovered(), pointer) {
            if self.gesture != Some(Gesture::Drag) {
                self.take_over(Gesture::Scroll {
                    last: Instant::now(),
                });
            }
            let zoom = self.camera.zoom + scroll as f64 / 120.0;
            self.camera = zoom_around(&self.camera, zoom, pos - rect.center());
            self.events.push(WidgetEvent::Move(self.camera));
        }

        if let Some(Gesture::Scroll { last }) = self.gesture {
            if last.elapsed() >= SCROLL_SETTLE {
                self.gesture = None;
                self.end_move();
            }
        }
    }

    /// Hands the camera to a user gesture, stopping any animation where it is
    fn take_over(&mut self, gesture: Gesture) {
        if self.flight.take().is_none() && self.gesture.is_none() {
            self.events.push(WidgetEvent::MoveStart);
        }
        self.gesture = Some(gesture);
    }

    fn navigate(&mut self, action: NavigationAction) {
        let mut target = self.flight.map(|f| f.to).unwrap_or(self.camera);
        match action {
            NavigationAction::ZoomIn => target.zoom += 1.0,
            NavigationAction::ZoomOut => target.zoom -= 1.0,
            NavigationAction::ResetNorth => target.bearing = 0.0,
        }
        self.start_flight(target, BUTTON_ANIMATION);
    }

    fn receive_tiles(&mut self) {
        for TileResult { url, data } in self.loader.poll() {
            let image = data.and_then(|bytes| decode_tile(&bytes));
            match image {
                Ok(image) => {
                    let texture = self.ctx.load_texture(&url, image, TextureOptions::LINEAR);
                    self.textures.insert(url, texture);
                }
                Err(e) => log::debug!("dropping tile {url}: {e}"),
            }
        }
    }

    fn paint_tiles(&mut self, ui: &Ui, rect: Rect) {
        let Some(source) = &self.source else {
            return;
        };

        let (min_zoom, max_zoom) = source.zoom_range();
        let z = self.camera.zoom.round().clamp(min_zoom as f64, max_zoom as f64) as u8;
        let scale = 2_f64.powf(self.camera.zoom - z as f64);
        let center = rect.center();
        let camera = self.camera;

        let mut meshes = Vec::new();
        for placement in camera.covering_tiles(rect.width() as f64, rect.height() as f64, z) {
            let url = source.url(placement.coord);
            let Some(texture) = self.textures.get(&url) else {
                if !self.loader.is_failed(&url) {
                    self.loader.request(&url);
                }
                continue;
            };

            let origin = placement.origin();
            let corners = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)].map(|(u, v)| {
                let world = Point::new(origin.x + u * TILE_SIZE, origin.y + v * TILE_SIZE)
                    .multiply(scale);
                let offset = camera.world_to_screen_offset(world);
                (
                    center + Vec2::new(offset.x as f32, offset.y as f32),
                    Pos2::new(u as f32, v as f32),
                )
            });

            let mut mesh = Mesh::with_texture(texture.id());
            for (pos, uv) in corners {
                mesh.vertices.push(Vertex {
                    pos,
                    uv,
                    color: Color32::WHITE,
                });
            }
            mesh.add_triangle(0, 1, 2);
            mesh.add_triangle(0, 2, 3);
            meshes.push(Shape::mesh(mesh));
        }

        ui.painter().with_clip_rect(rect).extend(meshes);
    }
}

impl MapWidget for TileMapWidget {
    fn camera(&self) -> Camera {
        self.camera
    }

    fn jump_to(&mut self, camera: Camera) {
        self.flight = None;
        self.begin_move();
        self.gesture = None;
        self.camera = clamp_zoom(camera);
        self.end_move();
        self.ctx.request_repaint();
    }

    fn fly_to(&mut self, camera: Camera, duration: Duration) {
        if duration.is_zero() {
            self.jump_to(camera);
        } else {
            self.start_flight(camera, duration);
        }
    }

    fn set_style(&mut self, style: StyleSpecification) {
        self.source = UrlTemplateSource::from_style(&style);
        match &self.source {
            Some(source) => log::debug!("basemap tiles from {}", source.template()),
            None => log::warn!("style has no raster basemap layer; map will stay blank"),
        }
        // Failures of the previous provider say nothing about the new one
        self.loader.forget_failures();
        self.style = Some(style);
        self.ctx.request_repaint();
    }

    fn set_attribution(&mut self, text: Option<String>) {
        self.attribution = text;
    }

    fn poll_events(&mut self) -> Vec<WidgetEvent> {
        std::mem::take(&mut self.events)
    }

    fn remove(&mut self) {
        self.flight = None;
        self.gesture = None;
        self.events.clear();
        self.style = None;
        self.source = None;
        self.textures.clear();
        self.loader.forget_failures();
    }
}

/// Creates [`TileMapWidget`]s inside an egui context
#[derive(Default)]
pub struct EguiWidgetFactory {
    ctx: Option<egui::Context>,
    tile_cache_size: usize,
}

impl EguiWidgetFactory {
    pub fn new(ctx: Option<egui::Context>, tile_cache_size: usize) -> Self {
        Self {
            ctx,
            tile_cache_size,
        }
    }
}

impl WidgetFactory for EguiWidgetFactory {
    type Widget = TileMapWidget;

    fn create(&mut self, options: MountOptions) -> Result<TileMapWidget> {
        let ctx = self
            .ctx
            .clone()
            .ok_or_else(|| MapError::Mount("no egui context to draw into".to_string()))?;
        Ok(TileMapWidget::new(ctx, options, self.tile_cache_size))
    }
}

fn decode_tile(bytes: &[u8]) -> Result<ColorImage> {
    let image = image::load_from_memory(bytes)
        .map_err(|e| MapError::Tile(format!("undecodable tile image: {e}")))?
        .to_rgba8();
    let size = [image.width() as usize, image.height() as usize];
    Ok(ColorImage::from_rgba_unmultiplied(size, image.as_raw()))
}

fn clamp_zoom(mut camera: Camera) -> Camera {
    camera.zoom = camera.zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    camera
}

/// Camera at `zoom` that keeps the point under `offset` (from the view
/// center, in screen points) fixed
fn zoom_around(camera: &Camera, zoom: f64, offset: Vec2) -> Camera {
    let zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    let offset = Point::new(offset.x as f64, offset.y as f64);
    let anchor = camera.screen_offset_to_lat_lng(offset);

    let anchor_px = project(&anchor, zoom);
    let center_px = anchor_px.subtract(&offset.rotate(camera.bearing));
    Camera::new(unproject(&center_px, zoom), zoom, camera.bearing)
}
