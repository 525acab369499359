use crate::ui::style::{AttributionStyle, ControlStyle, ScaleBarStyle};
use egui::{Align2, FontId, Pos2, Rect, Response, Sense, Ui, Vec2};

/// Simple position type for UI elements
#[derive(Debug, Clone, PartialEq)]
pub enum Position {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    RightCenter,
    Custom { x: f32, y: f32 },
}

impl Position {
    pub fn calculate_rect(&self, container: Rect, size: Vec2, margin: f32) -> Rect {
        let pos = match self {
            Position::TopLeft => container.min + Vec2::new(margin, margin),
            Position::TopRight => {
                Pos2::new(container.max.x - margin - size.x, container.min.y + margin)
            }
            Position::BottomLeft => {
                container.min + Vec2::new(margin, container.height() - margin - size.y)
            }
            Position::BottomRight => container.max - Vec2::new(margin + size.x, margin + size.y),
            Position::RightCenter => {
                let y = container.center().y - size.y / 2.0;
                Pos2::new(container.max.x - margin - size.x, y)
            }
            Position::Custom { x, y } => container.min + Vec2::new(*x, *y),
        };
        Rect::from_min_size(pos, size)
    }
}

/// Draws one square control button and reports clicks
fn control_button(ui: &mut Ui, rect: Rect, text: &str, style: &ControlStyle) -> Response {
    let response = ui.allocate_rect(rect, Sense::click());

    let bg_color = if response.is_pointer_button_down_on() {
        style.pressed_color
    } else if response.hovered() {
        style.hover_color
    } else {
        style.background_color
    };

    ui.painter().rect_filled(rect, style.rounding, bg_color);
    ui.painter().rect_stroke(rect, style.rounding, style.border_stroke);
    ui.painter().text(
        rect.center(),
        Align2::CENTER_CENTER,
        text,
        FontId::proportional(16.0),
        style.text_color,
    );

    response
}

/// What a click on the navigation control asks for
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NavigationAction {
    ZoomIn,
    ZoomOut,
    ResetNorth,
}

/// Zoom in / zoom out / compass buttons stacked vertically
#[derive(Debug, Clone)]
pub struct NavigationControl {
    pub position: Position,
    pub visible: bool,
}

impl NavigationControl {
    pub fn new(position: Position) -> Self {
        Self {
            position,
            visible: true,
        }
    }

    /// Draws the buttons; the compass arrow points at north under `bearing`
    pub fn show(
        &self,
        ui: &mut Ui,
        container: Rect,
        bearing: f64,
        style: &ControlStyle,
    ) -> Option<NavigationAction> {
        if !self.visible {
            return None;
        }

        let gap = 4.0;
        let size = Vec2::new(style.button_size, style.button_size * 3.0 + gap * 2.0);
        let area = self.position.calculate_rect(container, size, style.margin);
        let button = |i: f32| {
            Rect::from_min_size(
                area.min + Vec2::new(0.0, i * (style.button_size + gap)),
                Vec2::splat(style.button_size),
            )
        };

        let mut action = None;
        if control_button(ui, button(0.0), "+", style).clicked() {
            action = Some(NavigationAction::ZoomIn);
        }
        if control_button(ui, button(1.0), "-", style).clicked() {
            action = Some(NavigationAction::ZoomOut);
        }

        let compass = button(2.0);
        if control_button(ui, compass, "", style).clicked() {
            action = Some(NavigationAction::ResetNorth);
        }
        let angle = -(bearing as f32).to_radians();
        let tip = compass.center() + Vec2::angled(angle - std::f32::consts::FRAC_PI_2) * 9.0;
        let tail = compass.center() - Vec2::angled(angle - std::f32::consts::FRAC_PI_2) * 9.0;
        ui.painter().line_segment(
            [compass.center(), tip],
            egui::Stroke::new(3.0, egui::Color32::from_rgb(200, 40, 40)),
        );
        ui.painter()
            .line_segment([compass.center(), tail], egui::Stroke::new(3.0, style.text_color));

        action
    }
}

/// Attribution text in the bottom-right corner
pub fn paint_attribution(ui: &Ui, container: Rect, text: &str, style: &AttributionStyle) {
    let galley = ui
        .painter()
        .layout_no_wrap(text.to_string(), style.font_id.clone(), style.text_color);
    let size = galley.size() + Vec2::splat(style.padding * 2.0);
    let rect = Position::BottomRight.calculate_rect(container, size, style.margin);

    ui.painter().rect_filled(rect, 0.0, style.background_color);
    ui.painter().galley(
        rect.min + Vec2::splat(style.padding),
        galley,
        style.text_color,
    );
}

/// Largest 1/2/5 x 10^n value not above `max`
pub fn nice_distance(max: f64) -> f64 {
    if max <= 0.0 || !max.is_finite() {
        return 0.0;
    }
    let magnitude = 10_f64.powf(max.log10().floor());
    let leading = max / magnitude;
    let step = if leading >= 5.0 {
        5.0
    } else if leading >= 2.0 {
        2.0
    } else {
        1.0
    };
    step * magnitude
}

/// Formats a distance in metres the way the scale bar labels it
pub fn format_distance(meters: f64) -> String {
    if meters >= 1000.0 {
        format!("{} km", meters / 1000.0)
    } else {
        format!("{meters} m")
    }
}

/// Metric scale bar in the bottom-left corner
pub fn paint_scale_bar(ui: &Ui, container: Rect, meters_per_point: f64, style: &ScaleBarStyle) {
    let distance = nice_distance(meters_per_point * style.max_width as f64);
    if distance <= 0.0 {
        return;
    }

    let width = (distance / meters_per_point) as f32;
    let size = Vec2::new(width, 18.0);
    let rect = Position::BottomLeft.calculate_rect(container, size, style.margin);
    let painter = ui.painter();

    painter.rect_filled(rect, 0.0, style.background_color);
    painter.line_segment([rect.left_bottom(), rect.right_bottom()], style.stroke);
    painter.line_segment([rect.left_bottom(), rect.left_top()], style.stroke);
    painter.line_segment([rect.right_bottom(), rect.right_top()], style.stroke);
    painter.text(
        rect.center(),
        Align2::CENTER_CENTER,
        format_distance(distance),
        style.font_id.clone(),
        style.text_color,
    );
}
