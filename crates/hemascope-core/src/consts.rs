/// Tolerance used when comparing mapped coordinates against surface bounds.
pub const GEOMETRY_EPSILON: f32 = 1e-4;

/// Minimum surface pixel count (w*h) to resample image rows in parallel.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;

/// Default magnification of the zoomed hub inset.
pub const DEFAULT_INSET_ZOOM: f32 = 4.0;

/// Default inset surface size in display pixels.
pub const DEFAULT_INSET_SIZE: f32 = 200.0;

/// Initial main-view zoom.
pub const DEFAULT_ZOOM: f32 = 1.0;

/// Zoom increment used by zoom-in/zoom-out actions.
pub const DEFAULT_ZOOM_STEP: f32 = 0.1;

/// Lower bound of the hub zoom range.
pub const HUB_MIN_ZOOM: f32 = 1.0;

/// Lower bound of the viewer slider zoom range.
pub const SLIDER_MIN_ZOOM: f32 = 0.5;

/// Upper bound shared by both zoom ranges.
pub const MAX_ZOOM: f32 = 5.0;

/// Default annotation outline width in display pixels.
pub const DEFAULT_STROKE_WIDTH: f32 = 2.0;

/// Radius of the pointer indicator dot in display pixels.
pub const POINTER_INDICATOR_RADIUS: f32 = 8.0;

/// Side of one bitmap font glyph in pixels.
pub const GLYPH_SIZE: u32 = 8;

/// Detection filter region: keep boxes starting in the top-left 300x300.
pub const DEFAULT_DETECTION_REGION: f32 = 300.0;

/// Detection filter count limit.
pub const DEFAULT_DETECTION_LIMIT: usize = 20;
