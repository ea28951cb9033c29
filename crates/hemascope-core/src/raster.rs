use std::path::Path;

use font8x8::{UnicodeFonts, BASIC_FONTS};
use image::imageops::{self, FilterType};
use image::{ImageFormat, Rgba, RgbaImage};
use rayon::prelude::*;
use tiny_skia::{
    ColorU8, FillRule, Paint, PathBuilder, Pixmap, PixmapPaint, Rect, Stroke, Transform,
};

use crate::consts::{GLYPH_SIZE, PARALLEL_PIXEL_THRESHOLD};
use crate::error::{HemascopeError, Result};
use crate::geometry::{ImageRect, ScreenPoint, ScreenRect, SurfaceSize};
use crate::image_handle::SlideImage;
use crate::surface::{Color, Surface};

/// In-memory RGBA surface backed by a `tiny_skia` pixmap. Used by the CLI and
/// by tests.
#[derive(Clone, Debug)]
pub struct RasterSurface {
    pixmap: Pixmap,
}

fn paint(color: Color, anti_alias: bool) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, color.a);
    paint.anti_alias = anti_alias;
    paint
}

/// Convert straight-alpha RGBA into a premultiplied pixmap.
fn image_to_pixmap(image: &RgbaImage) -> Option<Pixmap> {
    let mut pixmap = Pixmap::new(image.width(), image.height())?;
    let convert = |(dst, src): (&mut tiny_skia::PremultipliedColorU8, &[u8])| {
        *dst = ColorU8::from_rgba(src[0], src[1], src[2], src[3]).premultiply();
    };
    let dst = pixmap.pixels_mut();
    if dst.len() >= PARALLEL_PIXEL_THRESHOLD {
        dst.par_iter_mut()
            .zip(image.as_raw().par_chunks_exact(4))
            .for_each(convert);
    } else {
        dst.iter_mut()
            .zip(image.as_raw().chunks_exact(4))
            .for_each(convert);
    }
    Some(pixmap)
}

impl RasterSurface {
    /// Allocate a `width` x `height` surface. Fails when either side is zero.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        Pixmap::new(width, height)
            .map(|pixmap| Self { pixmap })
            .ok_or(HemascopeError::SurfaceUnavailable {
                width: width as f32,
                height: height as f32,
            })
    }

    /// Allocate a surface for an output of `size` display pixels, rounded to
    /// whole pixels. Fails when the size has no area.
    pub fn for_size(size: SurfaceSize) -> Result<Self> {
        let (width, height) = (size.width.round(), size.height.round());
        if !size.is_available() || width < 1.0 || height < 1.0 {
            return Err(HemascopeError::SurfaceUnavailable {
                width: size.width,
                height: size.height,
            });
        }
        Self::new(width as u32, height as u32)
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Straight-alpha pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.pixmap.pixel(x, y).map(|p| {
            let c = p.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
    }

    /// Copy out as a straight-alpha image.
    pub fn to_image(&self) -> RgbaImage {
        RgbaImage::from_fn(self.width(), self.height(), |x, y| {
            Rgba(self.pixel(x, y).unwrap_or_default())
        })
    }

    pub fn save_png(&self, path: &Path) -> Result<()> {
        self.to_image().save_with_format(path, ImageFormat::Png)?;
        Ok(())
    }
}

impl Surface for RasterSurface {
    fn size(&self) -> SurfaceSize {
        SurfaceSize::new(self.width() as f32, self.height() as f32)
    }

    fn fill(&mut self, color: Color) {
        self.pixmap
            .fill(tiny_skia::Color::from_rgba8(color.r, color.g, color.b, color.a));
    }

    fn draw_image(&mut self, image: &SlideImage, src: ImageRect, dst: ScreenRect) {
        if src.width <= 0.0 || src.height <= 0.0 || dst.width <= 0.0 || dst.height <= 0.0 {
            return;
        }
        let source = image.pixels();
        let (iw, ih) = (source.width() as f32, source.height() as f32);
        if iw < 1.0 || ih < 1.0 {
            return;
        }
        let (sx, sy) = (dst.width / src.width, dst.height / src.height);

        // Only the part of `src` on the image is drawn, and only where it
        // lands on the surface.
        let left = (dst.x + (0.0 - src.x) * sx).max(dst.x).max(0.0).round();
        let top = (dst.y + (0.0 - src.y) * sy).max(dst.y).max(0.0).round();
        let right = (dst.x + (iw - src.x) * sx)
            .min(dst.right())
            .min(self.width() as f32)
            .round();
        let bottom = (dst.y + (ih - src.y) * sy)
            .min(dst.bottom())
            .min(self.height() as f32)
            .round();
        if right <= left || bottom <= top {
            return;
        }

        // Source pixels behind the visible target.
        let x0 = (src.x + (left - dst.x) / sx).floor().clamp(0.0, iw - 1.0);
        let y0 = (src.y + (top - dst.y) / sy).floor().clamp(0.0, ih - 1.0);
        let x1 = (src.x + (right - dst.x) / sx).ceil().clamp(x0 + 1.0, iw);
        let y1 = (src.y + (bottom - dst.y) / sy).ceil().clamp(y0 + 1.0, ih);

        let crop = imageops::crop_imm(
            source,
            x0 as u32,
            y0 as u32,
            (x1 - x0) as u32,
            (y1 - y0) as u32,
        )
        .to_image();
        let scaled = imageops::resize(
            &crop,
            (right - left) as u32,
            (bottom - top) as u32,
            FilterType::Nearest,
        );
        let Some(tile) = image_to_pixmap(&scaled) else {
            return;
        };
        self.pixmap.draw_pixmap(
            left as i32,
            top as i32,
            tile.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );
    }

    fn stroke_rect(&mut self, rect: ScreenRect, color: Color, width: f32) {
        let Some(r) = Rect::from_xywh(rect.x, rect.y, rect.width, rect.height) else {
            return;
        };
        let path = PathBuilder::from_rect(r);
        let stroke = Stroke {
            width: width.max(1.0),
            ..Default::default()
        };
        self.pixmap.stroke_path(
            &path,
            &paint(color, false),
            &stroke,
            Transform::identity(),
            None,
        );
    }

    fn draw_label(&mut self, at: ScreenPoint, text: &str, color: Color) {
        let (x, y) = (at.x.round(), at.y.round());
        let mut pb = PathBuilder::new();
        for (i, ch) in text.chars().enumerate() {
            let Some(glyph) = BASIC_FONTS.get(ch).or_else(|| BASIC_FONTS.get('?')) else {
                continue;
            };
            let gx = x + (i as u32 * GLYPH_SIZE) as f32;
            for (row_idx, row) in glyph.iter().enumerate() {
                for col in 0..GLYPH_SIZE {
                    if (row >> col) & 1 == 1 {
                        if let Some(cell) =
                            Rect::from_xywh(gx + col as f32, y + row_idx as f32, 1.0, 1.0)
                        {
                            pb.push_rect(cell);
                        }
                    }
                }
            }
        }
        if let Some(path) = pb.finish() {
            self.pixmap.fill_path(
                &path,
                &paint(color, false),
                FillRule::Winding,
                Transform::identity(),
                None,
            );
        }
    }

    fn fill_circle(&mut self, center: ScreenPoint, radius: f32, color: Color) {
        if !radius.is_finite() || radius <= 0.0 {
            return;
        }
        let (w, h) = (self.width() as f32, self.height() as f32);
        if center.x + radius < 0.0
            || center.y + radius < 0.0
            || center.x - radius > w
            || center.y - radius > h
        {
            return;
        }
        // A circle covering every corner is a plain fill of the surface.
        let dx = center.x.abs().max((w - center.x).abs());
        let dy = center.y.abs().max((h - center.y).abs());
        if dx * dx + dy * dy <= radius * radius {
            if let Some(all) = Rect::from_xywh(0.0, 0.0, w, h) {
                self.pixmap
                    .fill_rect(all, &paint(color, false), Transform::identity(), None);
            }
            return;
        }
        let Some(path) = PathBuilder::from_circle(center.x, center.y, radius) else {
            return;
        };
        self.pixmap.fill_path(
            &path,
            &paint(color, true),
            FillRule::Winding,
            Transform::identity(),
            None,
        );
    }
}
