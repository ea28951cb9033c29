use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::annotation::AnnotationSet;
use crate::consts::DEFAULT_INSET_ZOOM;
use crate::focus::FocusSubscriber;
use crate::geometry::{
    image_rect_to_inset, CropRegion, FocusPoint, ImageSize, ScreenRect, SurfaceSize,
};
use crate::image_handle::ImageHandle;
use crate::surface::Surface;

use super::{
    draw_annotation, precheck, AnnotationsKey, ImageKey, RenderReport, RenderStatus, RenderStyle,
    SkippedAnnotation,
};

/// How the crop origin behaves near the image edges.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClampMode {
    /// Keep the crop inside the image.
    #[default]
    Clamped,
    /// Centre on the focus point even past the edges; uncovered inset area
    /// shows the background.
    Unclamped,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsetParams {
    /// Magnification relative to one image pixel per inset pixel.
    pub zoom: f32,
    pub clamp: ClampMode,
}

impl Default for InsetParams {
    fn default() -> Self {
        Self {
            zoom: DEFAULT_INSET_ZOOM,
            clamp: ClampMode::Clamped,
        }
    }
}

/// Image region shown by an inset of `inset` display pixels: `inset / zoom`
/// image pixels centred on the focus point.
///
/// Returns `None` for a non-positive zoom or an inset without area.
pub fn inset_crop(
    focus: FocusPoint,
    image: ImageSize,
    inset: SurfaceSize,
    zoom: f32,
    clamp: ClampMode,
) -> Option<CropRegion> {
    if !zoom.is_finite() || zoom <= 0.0 || !inset.is_available() {
        return None;
    }
    let (cx, cy) = focus.to_image(image);
    let crop = CropRegion::centered(cx, cy, inset.width / zoom, inset.height / zoom);
    Some(match clamp {
        ClampMode::Clamped => crop.clamped(image),
        ClampMode::Unclamped => crop,
    })
}

/// Draw the zoomed crop around `focus` and the annotations fully inside it.
pub fn render_inset<S: Surface + ?Sized>(
    surface: &mut S,
    image: &ImageHandle,
    focus: FocusPoint,
    annotations: &AnnotationSet,
    params: &InsetParams,
    style: &RenderStyle,
) -> RenderReport {
    let size = match precheck(surface, image, style) {
        Ok(size) => size,
        Err(report) => return report,
    };
    let Some(slide) = image.ready() else {
        return RenderReport::with_status(RenderStatus::Placeholder);
    };
    let Some(crop) = inset_crop(focus, slide.size(), size, params.zoom, params.clamp) else {
        warn!(zoom = params.zoom, "Invalid inset zoom, showing placeholder");
        surface.draw_placeholder("Image unavailable", style.background, style.placeholder_color);
        return RenderReport::with_status(RenderStatus::Placeholder);
    };

    surface.fill(style.background);
    surface.draw_image(slide, crop.as_image_rect(), ScreenRect::from_size(size));

    let mut report = RenderReport::with_status(RenderStatus::Drawn);
    report.crop = Some(crop);
    if !style.show_annotations {
        return report;
    }
    for (index, annotation) in annotations.iter().enumerate() {
        if let Err(e) = annotation.validate(index) {
            warn!(index, reason = %e, "Skipping annotation in inset");
            report.skipped.push(SkippedAnnotation {
                index,
                reason: e.to_string(),
            });
            continue;
        }
        match image_rect_to_inset(&annotation.rect, &crop, size) {
            Some(rect) => {
                draw_annotation(surface, annotation, rect, style);
                report.annotations_drawn += 1;
            }
            None => report.annotations_hidden += 1,
        }
    }
    report
}

#[derive(Clone, Debug, PartialEq)]
struct InsetKey {
    focus_revision: u64,
    image: ImageKey,
    annotations: AnnotationsKey,
    size: SurfaceSize,
    params: InsetParams,
    style: RenderStyle,
}

/// Inset renderer driven by the shared focus channel. It reads nothing from
/// the main viewport, so panning there has no effect here.
#[derive(Debug)]
pub struct InsetRenderer {
    focus: FocusSubscriber,
    last: Option<InsetKey>,
}

impl InsetRenderer {
    pub fn new(focus: FocusSubscriber) -> Self {
        Self { focus, last: None }
    }

    pub fn focus(&self) -> FocusPoint {
        self.focus.latest().point
    }

    fn key(
        revision: u64,
        image: &ImageHandle,
        annotations: &AnnotationSet,
        size: SurfaceSize,
        params: &InsetParams,
        style: &RenderStyle,
    ) -> InsetKey {
        InsetKey {
            focus_revision: revision,
            image: ImageKey::of(image),
            annotations: AnnotationsKey::of(annotations),
            size,
            params: *params,
            style: style.clone(),
        }
    }

    pub fn needs_redraw(
        &self,
        image: &ImageHandle,
        annotations: &AnnotationSet,
        size: SurfaceSize,
        params: &InsetParams,
        style: &RenderStyle,
    ) -> bool {
        let key = Self::key(self.focus.latest().revision, image, annotations, size, params, style);
        self.last.as_ref() != Some(&key)
    }

    pub fn render<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        image: &ImageHandle,
        annotations: &AnnotationSet,
        params: &InsetParams,
        style: &RenderStyle,
    ) -> RenderReport {
        let snap = self.focus.latest();
        self.last = Some(Self::key(
            snap.revision,
            image,
            annotations,
            surface.size(),
            params,
            style,
        ));
        render_inset(surface, image, snap.point, annotations, params, style)
    }
}
