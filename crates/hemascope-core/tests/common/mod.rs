use hemascope_core::geometry::{ImageRect, ScreenPoint, ScreenRect, SurfaceSize};
use hemascope_core::image_handle::{ImageHandle, SlideImage};
use hemascope_core::surface::{Color, Surface};
use image::{Rgba, RgbaImage};

/// One call made against a [`RecordingSurface`].
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCall {
    Fill(Color),
    Image { src: ImageRect, dst: ScreenRect },
    Stroke(ScreenRect),
    Label { at: ScreenPoint, text: String },
    Circle { center: ScreenPoint, radius: f32 },
}

/// Surface that records every draw call instead of rasterizing.
pub struct RecordingSurface {
    pub size: SurfaceSize,
    pub calls: Vec<DrawCall>,
}

impl RecordingSurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: SurfaceSize::new(width, height),
            calls: Vec::new(),
        }
    }

    pub fn strokes(&self) -> Vec<ScreenRect> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::Stroke(r) => Some(*r),
                _ => None,
            })
            .collect()
    }

    pub fn images(&self) -> Vec<(ImageRect, ScreenRect)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::Image { src, dst } => Some((*src, *dst)),
                _ => None,
            })
            .collect()
    }

    pub fn labels(&self) -> Vec<String> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::Label { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> SurfaceSize {
        self.size
    }

    fn fill(&mut self, color: Color) {
        self.calls.push(DrawCall::Fill(color));
    }

    fn draw_image(&mut self, _image: &SlideImage, src: ImageRect, dst: ScreenRect) {
        self.calls.push(DrawCall::Image { src, dst });
    }

    fn stroke_rect(&mut self, rect: ScreenRect, _color: Color, _width: f32) {
        self.calls.push(DrawCall::Stroke(rect));
    }

    fn draw_label(&mut self, at: ScreenPoint, text: &str, _color: Color) {
        self.calls.push(DrawCall::Label {
            at,
            text: text.to_string(),
        });
    }

    fn fill_circle(&mut self, center: ScreenPoint, radius: f32, _color: Color) {
        self.calls.push(DrawCall::Circle { center, radius });
    }
}

/// Uniformly coloured RGBA image.
pub fn solid_image(width: u32, height: u32, rgba: [u8; 4]) -> RgbaImage {
    RgbaImage::from_pixel(width, height, Rgba(rgba))
}

/// Image whose left half is red and right half is blue.
pub fn split_image(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, _| {
        if x < width / 2 {
            Rgba([255, 0, 0, 255])
        } else {
            Rgba([0, 0, 255, 255])
        }
    })
}

pub fn ready_handle(width: u32, height: u32) -> ImageHandle {
    ImageHandle::Ready(SlideImage::new(1, solid_image(width, height, [200, 200, 200, 255])))
}

/// Case JSON in the detector output layout.
pub fn sample_case_json(image: &str) -> String {
    serde_json::json!({
        "patient_id": "P-0042",
        "sample_type": "Blood",
        "image": image,
        "filename": "slide_0042.png",
        "inference_results": {
            "output": {
                "detection_results": [
                    [10, 20, 40, 60, "Circular_RBC"],
                    [100, 100, 150, 130, "Elongated_RBC"],
                    [400, 50, 420, 80, "Circular_RBC"],
                    [250, 290, 280, 320, "WBC"]
                ]
            }
        }
    })
    .to_string()
}
