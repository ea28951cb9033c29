//! Conversions between the three coordinate spaces of the viewer.
//!
//! * image-pixel space: origin at the top-left of the source raster, units are
//!   source pixels.
//! * surface space: the display target, units are display pixels. The image is
//!   fit-scaled and letterboxed into it, then optionally zoomed and panned.
//! * normalized space: `(u, v)` fractions of an extent, used for the focus point.

use serde::{Deserialize, Serialize};

use crate::consts::GEOMETRY_EPSILON;

/// Pixel dimensions of a decoded image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl ImageSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn width_f32(&self) -> f32 {
        self.width as f32
    }

    pub fn height_f32(&self) -> f32 {
        self.height as f32
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Dimensions of a display surface in display pixels.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct SurfaceSize {
    pub width: f32,
    pub height: f32,
}

impl SurfaceSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn square(side: f32) -> Self {
        Self::new(side, side)
    }

    /// A surface can be drawn on only when both sides are finite and positive.
    pub fn is_available(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    pub fn center(&self) -> ScreenPoint {
        ScreenPoint::new(self.width / 2.0, self.height / 2.0)
    }
}

/// A position in surface space.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
}

impl ScreenPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Normalized `(u, v)` coordinates. Values in `[0, 1]` cover the full extent;
/// the mapper itself does not clamp.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FocusPoint {
    pub u: f32,
    pub v: f32,
}

impl FocusPoint {
    pub const CENTER: Self = Self { u: 0.5, v: 0.5 };

    pub fn new(u: f32, v: f32) -> Self {
        Self { u, v }
    }

    /// Clamp both components into `[0, 1]`. Non-finite components become 0.
    pub fn clamped(self) -> Self {
        let clamp = |c: f32| if c.is_finite() { c.clamp(0.0, 1.0) } else { 0.0 };
        Self {
            u: clamp(self.u),
            v: clamp(self.v),
        }
    }

    /// Position of this focus point in image-pixel space.
    pub fn to_image(&self, image: ImageSize) -> (f32, f32) {
        (self.u * image.width_f32(), self.v * image.height_f32())
    }
}

impl Default for FocusPoint {
    fn default() -> Self {
        Self::CENTER
    }
}

/// Accumulated pan of the main view, in pre-zoom surface pixels.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct PanOffset {
    pub x: f32,
    pub y: f32,
}

impl PanOffset {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn translated(self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Rectangle in image-pixel space, `(x, y, width, height)` convention.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct ImageRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl ImageRect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build from two opposite corners. Corners are not reordered, so a
    /// swapped pair yields a negative size that validation will reject.
    pub fn from_corners(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self::new(x0, y0, x1 - x0, y1 - y0)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Returns the reason this rectangle cannot be drawn, if any.
    pub fn defect(&self) -> Option<String> {
        if ![self.x, self.y, self.width, self.height]
            .iter()
            .all(|v| v.is_finite())
        {
            return Some(format!(
                "non-finite geometry ({}, {}, {}, {})",
                self.x, self.y, self.width, self.height
            ));
        }
        if self.width < 0.0 || self.height < 0.0 {
            return Some(format!(
                "negative size {}x{}",
                self.width, self.height
            ));
        }
        None
    }
}

/// Rectangle in surface space.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct ScreenRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl ScreenRect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_size(size: SurfaceSize) -> Self {
        Self::new(0.0, 0.0, size.width, size.height)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn size(&self) -> SurfaceSize {
        SurfaceSize::new(self.width, self.height)
    }

    pub fn contains(&self, p: ScreenPoint) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }
}

/// Region of the source image shown by the inset, in image pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CropRegion {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl CropRegion {
    /// Crop of the given size centred on `(cx, cy)`.
    pub fn centered(cx: f32, cy: f32, width: f32, height: f32) -> Self {
        Self {
            x: cx - width / 2.0,
            y: cy - height / 2.0,
            width,
            height,
        }
    }

    /// Keep the crop inside the image: origin clamped to `[0, dim - crop]`.
    /// A crop larger than the image is pinned to the origin.
    pub fn clamped(&self, image: ImageSize) -> Self {
        let max_x = (image.width_f32() - self.width).max(0.0);
        let max_y = (image.height_f32() - self.height).max(0.0);
        Self {
            x: self.x.clamp(0.0, max_x),
            y: self.y.clamp(0.0, max_y),
            width: self.width,
            height: self.height,
        }
    }

    pub fn as_image_rect(&self) -> ImageRect {
        ImageRect::new(self.x, self.y, self.width, self.height)
    }
}

/// Divide a surface-space position by the surface dimensions.
///
/// Returns `None` for a surface without positive area. The result is not
/// clamped: positions outside the surface map outside the unit range.
pub fn to_normalized(
    screen_x: f32,
    screen_y: f32,
    surface_w: f32,
    surface_h: f32,
) -> Option<FocusPoint> {
    if !SurfaceSize::new(surface_w, surface_h).is_available() {
        return None;
    }
    Some(FocusPoint::new(screen_x / surface_w, screen_y / surface_h))
}

/// Largest uniform scale at which the image fits the surface on both axes.
///
/// All four dimensions must be positive; callers guard this through
/// [`ViewTransform::fit`].
pub fn fit_scale(image_w: f32, image_h: f32, surface_w: f32, surface_h: f32) -> f32 {
    (surface_w / image_w).min(surface_h / image_h)
}

/// Offset that centres the scaled image within the surface.
pub fn letterbox_offset(
    image_w: f32,
    image_h: f32,
    surface_w: f32,
    surface_h: f32,
    scale: f32,
) -> (f32, f32) {
    (
        (surface_w - image_w * scale) / 2.0,
        (surface_h - image_h * scale) / 2.0,
    )
}

/// Affine image-to-surface mapping of a rectangle.
pub fn image_rect_to_screen(rect: &ImageRect, scale: f32, offset: (f32, f32)) -> ScreenRect {
    ScreenRect::new(
        offset.0 + rect.x * scale,
        offset.1 + rect.y * scale,
        rect.width * scale,
        rect.height * scale,
    )
}

/// Inverse of [`image_rect_to_screen`]. `scale` must be non-zero.
pub fn screen_rect_to_image(rect: &ScreenRect, scale: f32, offset: (f32, f32)) -> ImageRect {
    ImageRect::new(
        (rect.x - offset.0) / scale,
        (rect.y - offset.1) / scale,
        rect.width / scale,
        rect.height / scale,
    )
}

/// Map an image-space rectangle into inset coordinates.
///
/// Returns `None` when any edge of the mapped rectangle falls outside the
/// inset; partially visible annotations are never drawn in the inset.
pub fn image_rect_to_inset(
    rect: &ImageRect,
    crop: &CropRegion,
    inset: SurfaceSize,
) -> Option<ScreenRect> {
    if !inset.is_available() || crop.width <= 0.0 || crop.height <= 0.0 {
        return None;
    }
    let sx = inset.width / crop.width;
    let sy = inset.height / crop.height;
    let mapped = ScreenRect::new(
        (rect.x - crop.x) * sx,
        (rect.y - crop.y) * sy,
        rect.width * sx,
        rect.height * sy,
    );

    let inside = mapped.x >= -GEOMETRY_EPSILON
        && mapped.y >= -GEOMETRY_EPSILON
        && mapped.right() <= inset.width + GEOMETRY_EPSILON
        && mapped.bottom() <= inset.height + GEOMETRY_EPSILON;
    inside.then_some(mapped)
}

/// Image-to-surface transform: `screen = offset + image * scale`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
    pub scale: f32,
    pub offset_x: f32,
    pub offset_y: f32,
}

impl ViewTransform {
    /// Fit-scale and letterbox the image into the surface.
    ///
    /// Returns `None` when either the image or the surface has no area.
    pub fn fit(image: ImageSize, surface: SurfaceSize) -> Option<Self> {
        if image.is_empty() || !surface.is_available() {
            return None;
        }
        let (iw, ih) = (image.width_f32(), image.height_f32());
        let scale = fit_scale(iw, ih, surface.width, surface.height);
        let (offset_x, offset_y) = letterbox_offset(iw, ih, surface.width, surface.height, scale);
        Some(Self {
            scale,
            offset_x,
            offset_y,
        })
    }

    /// Fit transform followed by a zoom about the surface centre and a pan in
    /// pre-zoom pixels: `screen = c + zoom * (fit(image) + pan - c)`.
    pub fn compose(
        image: ImageSize,
        surface: SurfaceSize,
        zoom: f32,
        pan: PanOffset,
    ) -> Option<Self> {
        if !zoom.is_finite() || zoom <= 0.0 {
            return None;
        }
        let fit = Self::fit(image, surface)?;
        let c = surface.center();
        Some(Self {
            scale: fit.scale * zoom,
            offset_x: c.x + zoom * (fit.offset_x + pan.x - c.x),
            offset_y: c.y + zoom * (fit.offset_y + pan.y - c.y),
        })
    }

    pub fn offset(&self) -> (f32, f32) {
        (self.offset_x, self.offset_y)
    }

    pub fn image_to_screen(&self, x: f32, y: f32) -> ScreenPoint {
        ScreenPoint::new(self.offset_x + x * self.scale, self.offset_y + y * self.scale)
    }

    pub fn screen_to_image(&self, p: ScreenPoint) -> (f32, f32) {
        (
            (p.x - self.offset_x) / self.scale,
            (p.y - self.offset_y) / self.scale,
        )
    }

    pub fn rect_to_screen(&self, rect: &ImageRect) -> ScreenRect {
        image_rect_to_screen(rect, self.scale, self.offset())
    }

    pub fn rect_to_image(&self, rect: &ScreenRect) -> ImageRect {
        screen_rect_to_image(rect, self.scale, self.offset())
    }

    /// Surface rectangle covered by the whole image.
    pub fn image_bounds(&self, image: ImageSize) -> ScreenRect {
        self.rect_to_screen(&ImageRect::new(
            0.0,
            0.0,
            image.width_f32(),
            image.height_f32(),
        ))
    }
}
