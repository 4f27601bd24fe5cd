//! Configuration for the layout engine

/// Configuration options for layout computation
#[derive(Debug, Clone)]
pub struct LayoutConfig {
    /// Size used for shapes whose size is unknown at layout time (width, height)
    pub default_shape_size: (f64, f64),

    /// Horizontal gap between neighbouring shapes
    pub spacing_x: f64,

    /// Vertical gap between neighbouring shapes
    pub spacing_y: f64,

    /// Offset of the top-left shape after a leveled layout
    pub margin: f64,

    /// Padding between a frame and its children on every side
    pub frame_padding: f64,

    /// Extra room above and below frame children for the frame's name
    pub frame_label_allowance: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            default_shape_size: (200.0, 80.0),
            spacing_x: 60.0,
            spacing_y: 80.0,
            margin: 50.0,
            frame_padding: 30.0,
            frame_label_allowance: 20.0,
        }
    }
}

impl LayoutConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default shape size
    pub fn with_shape_size(mut self, width: f64, height: f64) -> Self {
        self.default_shape_size = (width, height);
        self
    }

    /// Set the gaps between shapes
    pub fn with_spacing(mut self, x: f64, y: f64) -> Self {
        self.spacing_x = x;
        self.spacing_y = y;
        self
    }

    /// Set the leveled layout margin
    pub fn with_margin(mut self, margin: f64) -> Self {
        self.margin = margin;
        self
    }

    /// Set the frame padding
    pub fn with_frame_padding(mut self, padding: f64) -> Self {
        self.frame_padding = padding;
        self
    }
}
