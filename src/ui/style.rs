use egui::{Color32, FontId, Stroke};

/// Style configuration for everything drawn over the map
#[derive(Debug, Clone)]
pub struct MapStyle {
    /// Background color when no tiles are loaded
    pub background_color: Color32,
    /// Buttons of the navigation control
    pub controls: ControlStyle,
    /// Attribution text
    pub attribution: AttributionStyle,
    /// Scale bar
    pub scale_bar: ScaleBarStyle,
}

/// Style for control buttons
#[derive(Debug, Clone)]
pub struct ControlStyle {
    pub background_color: Color32,
    pub hover_color: Color32,
    pub pressed_color: Color32,
    pub text_color: Color32,
    pub border_stroke: Stroke,
    pub button_size: f32,
    /// Margin from the map edge
    pub margin: f32,
    pub rounding: f32,
}

/// Style for attribution text
#[derive(Debug, Clone)]
pub struct AttributionStyle {
    pub text_color: Color32,
    pub background_color: Color32,
    pub font_id: FontId,
    /// Padding around text
    pub padding: f32,
    /// Distance from the bottom-right corner
    pub margin: f32,
}

#[derive(Debug, Clone)]
pub struct ScaleBarStyle {
    pub stroke: Stroke,
    pub background_color: Color32,
    pub text_color: Color32,
    pub font_id: FontId,
    /// Longest the bar may get, in points
    pub max_width: f32,
    pub margin: f32,
}

impl Default for MapStyle {
    fn default() -> Self {
        Self {
            background_color: Color32::from_rgb(230, 230, 230),
            controls: ControlStyle::default(),
            attribution: AttributionStyle::default(),
            scale_bar: ScaleBarStyle::default(),
        }
    }
}

impl Default for ControlStyle {
    fn default() -> Self {
        Self {
            background_color: Color32::from_rgba_unmultiplied(255, 255, 255, 230),
            hover_color: Color32::from_rgb(240, 240, 240),
            pressed_color: Color32::from_rgb(210, 210, 210),
            text_color: Color32::from_gray(40),
            border_stroke: Stroke::new(1.0, Color32::from_gray(180)),
            button_size: 29.0,
            margin: 10.0,
            rounding: 4.0,
        }
    }
}

impl Default for AttributionStyle {
    fn default() -> Self {
        Self {
            text_color: Color32::from_gray(50),
            background_color: Color32::from_rgba_unmultiplied(255, 255, 255, 180),
            font_id: FontId::proportional(11.0),
            padding: 3.0,
            margin: 0.0,
        }
    }
}

impl Default for ScaleBarStyle {
    fn default() -> Self {
        Self {
            stroke: Stroke::new(1.5, Color32::from_gray(60)),
            background_color: Color32::from_rgba_unmultiplied(255, 255, 255, 160),
            text_color: Color32::from_gray(40),
            font_id: FontId::proportional(10.0),
            max_width: 100.0,
            margin: 10.0,
        }
    }
}
