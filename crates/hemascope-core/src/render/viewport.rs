use tracing::warn;

use crate::annotation::AnnotationSet;
use crate::geometry::{
    FocusPoint, ImageRect, ImageSize, PanOffset, ScreenPoint, SurfaceSize, ViewTransform,
};
use crate::image_handle::ImageHandle;
use crate::surface::Surface;

use super::{
    draw_annotation, precheck, AnnotationsKey, ImageKey, RenderReport, RenderStatus, RenderStyle,
    SkippedAnnotation,
};

/// Main-view state owned by the caller: zoom, accumulated pan, and the pointer
/// indicator position as a fraction of the surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewState {
    pub zoom: f32,
    pub pan: PanOffset,
    pub pointer: Option<FocusPoint>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan: PanOffset::ZERO,
            pointer: None,
        }
    }
}

impl ViewState {
    /// Transform used for both the image and its annotations.
    pub fn transform(&self, image: ImageSize, surface: SurfaceSize) -> Option<ViewTransform> {
        ViewTransform::compose(image, surface, self.zoom, self.pan)
    }
}

/// Draw background, fitted image and annotation overlays.
///
/// Repeated calls with the same inputs produce the same output. Never fails:
/// problems are reported in the returned [`RenderReport`].
pub fn render_viewport<S: Surface + ?Sized>(
    surface: &mut S,
    image: &ImageHandle,
    annotations: &AnnotationSet,
    view: &ViewState,
    style: &RenderStyle,
) -> RenderReport {
    let size = match precheck(surface, image, style) {
        Ok(size) => size,
        Err(report) => return report,
    };
    let Some(slide) = image.ready() else {
        return RenderReport::with_status(RenderStatus::Placeholder);
    };
    let image_size = slide.size();
    let Some(transform) = view.transform(image_size, size) else {
        surface.draw_placeholder("Image unavailable", style.background, style.placeholder_color);
        return RenderReport::with_status(RenderStatus::Placeholder);
    };

    surface.fill(style.background);
    surface.draw_image(
        slide,
        ImageRect::new(0.0, 0.0, image_size.width_f32(), image_size.height_f32()),
        transform.image_bounds(image_size),
    );

    let mut report = RenderReport::with_status(RenderStatus::Drawn);
    if style.show_annotations {
        for (index, annotation) in annotations.iter().enumerate() {
            if let Err(e) = annotation.validate(index) {
                warn!(index, reason = %e, "Skipping annotation");
                report.skipped.push(SkippedAnnotation {
                    index,
                    reason: e.to_string(),
                });
                continue;
            }
            draw_annotation(surface, annotation, transform.rect_to_screen(&annotation.rect), style);
            report.annotations_drawn += 1;
        }
    }

    if style.show_pointer {
        if let Some(p) = view.pointer {
            surface.fill_circle(
                ScreenPoint::new(p.u * size.width, p.v * size.height),
                style.pointer_radius,
                style.pointer_color,
            );
        }
    }

    report
}

#[derive(Clone, Debug, PartialEq)]
struct ViewportKey {
    image: ImageKey,
    annotations: AnnotationsKey,
    size: SurfaceSize,
    view: ViewState,
    style: RenderStyle,
}

/// Remembers the inputs of the last pass so callers redraw only when the
/// image, the annotation sequence, the surface size or the view changed.
#[derive(Debug, Default)]
pub struct ViewportRenderer {
    last: Option<ViewportKey>,
}

impl ViewportRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(
        image: &ImageHandle,
        annotations: &AnnotationSet,
        size: SurfaceSize,
        view: &ViewState,
        style: &RenderStyle,
    ) -> ViewportKey {
        ViewportKey {
            image: ImageKey::of(image),
            annotations: AnnotationsKey::of(annotations),
            size,
            view: *view,
            style: style.clone(),
        }
    }

    pub fn needs_redraw(
        &self,
        image: &ImageHandle,
        annotations: &AnnotationSet,
        size: SurfaceSize,
        view: &ViewState,
        style: &RenderStyle,
    ) -> bool {
        self.last.as_ref() != Some(&Self::key(image, annotations, size, view, style))
    }

    pub fn render<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        image: &ImageHandle,
        annotations: &AnnotationSet,
        view: &ViewState,
        style: &RenderStyle,
    ) -> RenderReport {
        self.last = Some(Self::key(image, annotations, surface.size(), view, style));
        render_viewport(surface, image, annotations, view, style)
    }

    /// Force the next `needs_redraw` to return `true`.
    pub fn invalidate(&mut self) {
        self.last = None;
    }
}
