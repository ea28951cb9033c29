use hemascope_core::geometry::{ImageRect, ScreenPoint, ScreenRect, SurfaceSize};
use hemascope_core::image_handle::SlideImage;
use hemascope_core::surface::{Color, Surface};

use crate::convert::to_color32;

/// Texture uploaded for one slide, keyed by the slide id.
pub struct SlideTexture {
    pub slide_id: u64,
    pub handle: egui::TextureHandle,
}

/// Renderer target backed by an egui painter clipped to `rect`. Surface
/// coordinates are relative to the rect's top-left corner.
pub struct EguiSurface<'a> {
    painter: egui::Painter,
    rect: egui::Rect,
    texture: Option<&'a SlideTexture>,
}

impl<'a> EguiSurface<'a> {
    pub fn new(ui: &egui::Ui, rect: egui::Rect, texture: Option<&'a SlideTexture>) -> Self {
        Self {
            painter: ui.painter_at(rect),
            rect,
            texture,
        }
    }

    fn pos(&self, x: f32, y: f32) -> egui::Pos2 {
        self.rect.min + egui::vec2(x, y)
    }

    fn screen_rect(&self, r: ScreenRect) -> egui::Rect {
        egui::Rect::from_min_size(self.pos(r.x, r.y), egui::vec2(r.width, r.height))
    }
}

impl Surface for EguiSurface<'_> {
    fn size(&self) -> SurfaceSize {
        SurfaceSize::new(self.rect.width(), self.rect.height())
    }

    fn fill(&mut self, color: Color) {
        self.painter.rect_filled(self.rect, 0.0, to_color32(color));
    }

    fn draw_image(&mut self, image: &SlideImage, src: ImageRect, dst: ScreenRect) {
        let Some(texture) = self.texture.filter(|t| t.slide_id == image.id()) else {
            return;
        };
        if src.width <= 0.0 || src.height <= 0.0 {
            return;
        }
        let size = image.size();
        let (iw, ih) = (size.width_f32(), size.height_f32());

        // Only the part of `src` that lies on the image is sampled; the rest
        // of `dst` keeps the background.
        let (x0, y0) = (src.x.max(0.0), src.y.max(0.0));
        let (x1, y1) = (src.right().min(iw), src.bottom().min(ih));
        if x1 <= x0 || y1 <= y0 {
            return;
        }
        let sx = dst.width / src.width;
        let sy = dst.height / src.height;
        let target = ScreenRect::new(
            dst.x + (x0 - src.x) * sx,
            dst.y + (y0 - src.y) * sy,
            (x1 - x0) * sx,
            (y1 - y0) * sy,
        );
        let uv = egui::Rect::from_min_max(
            egui::pos2(x0 / iw, y0 / ih),
            egui::pos2(x1 / iw, y1 / ih),
        );
        self.painter
            .image(texture.handle.id(), self.screen_rect(target), uv, egui::Color32::WHITE);
    }

    fn stroke_rect(&mut self, rect: ScreenRect, color: Color, width: f32) {
        self.painter.rect_stroke(
            self.screen_rect(rect),
            0.0,
            egui::Stroke::new(width, to_color32(color)),
            egui::StrokeKind::Middle,
        );
    }

    fn draw_label(&mut self, at: ScreenPoint, text: &str, color: Color) {
        self.painter.text(
            self.pos(at.x, at.y),
            egui::Align2::LEFT_TOP,
            text,
            egui::FontId::monospace(11.0),
            to_color32(color),
        );
    }

    fn fill_circle(&mut self, center: ScreenPoint, radius: f32, color: Color) {
        self.painter
            .circle_filled(self.pos(center.x, center.y), radius, to_color32(color));
    }
}
