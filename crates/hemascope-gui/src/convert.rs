use hemascope_core::image_handle::SlideImage;
use hemascope_core::surface::Color;
use image::imageops::FilterType;

pub fn to_color32(color: Color) -> egui::Color32 {
    egui::Color32::from_rgba_unmultiplied(color.r, color.g, color.b, color.a)
}

/// Convert a slide to an egui texture image, downscaling so neither side
/// exceeds `max_side`. Texture coordinates are normalized, so a smaller
/// texture still maps onto the full image.
pub fn slide_to_color_image(slide: &SlideImage, max_side: usize) -> egui::ColorImage {
    let pixels = slide.pixels();
    let (w, h) = pixels.dimensions();
    let longest = w.max(h) as usize;
    if max_side > 0 && longest > max_side {
        let scale = max_side as f32 / longest as f32;
        let nw = ((w as f32 * scale).round() as u32).max(1);
        let nh = ((h as f32 * scale).round() as u32).max(1);
        let small = image::imageops::resize(pixels, nw, nh, FilterType::Triangle);
        return egui::ColorImage::from_rgba_unmultiplied(
            [nw as usize, nh as usize],
            small.as_raw(),
        );
    }
    egui::ColorImage::from_rgba_unmultiplied([w as usize, h as usize], pixels.as_raw())
}
