use serde::{Deserialize, Serialize};

use crate::geometry::{ImageRect, ScreenPoint, ScreenRect, SurfaceSize};
use crate::image_handle::SlideImage;

/// Straight-alpha RGBA colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const YELLOW: Self = Self::rgb(234, 179, 8);
    pub const RED: Self = Self::rgb(239, 68, 68);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn gray(v: u8) -> Self {
        Self::rgb(v, v, v)
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// A display target the renderers draw onto.
///
/// Implementations exist for in-memory rasters ([`crate::raster::RasterSurface`])
/// and for the egui painter in the GUI. All coordinates are in surface space.
pub trait Surface {
    fn size(&self) -> SurfaceSize;

    /// Paint the whole surface.
    fn fill(&mut self, color: Color);

    /// Draw the `src` region of `image` (image pixels) into `dst`. Parts of
    /// `dst` outside the surface are clipped.
    fn draw_image(&mut self, image: &SlideImage, src: ImageRect, dst: ScreenRect);

    /// Outline `rect` with a stroke of `width` display pixels.
    fn stroke_rect(&mut self, rect: ScreenRect, color: Color, width: f32);

    /// Draw `text` with its top-left corner at `at`.
    fn draw_label(&mut self, at: ScreenPoint, text: &str, color: Color);

    fn fill_circle(&mut self, center: ScreenPoint, radius: f32, color: Color);

    /// Replace the content with a labelled "unavailable" indication.
    fn draw_placeholder(&mut self, message: &str, background: Color, color: Color) {
        self.fill(background);
        let size = self.size();
        self.draw_label(
            ScreenPoint::new(size.width * 0.1, size.height / 2.0),
            message,
            color,
        );
    }
}
