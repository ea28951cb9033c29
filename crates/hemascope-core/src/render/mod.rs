pub mod inset;
pub mod viewport;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::annotation::{Annotation, AnnotationSet};
use crate::consts::{DEFAULT_STROKE_WIDTH, POINTER_INDICATOR_RADIUS};
use crate::geometry::{CropRegion, ScreenPoint, ScreenRect, SurfaceSize};
use crate::image_handle::ImageHandle;
use crate::surface::{Color, Surface};

pub use inset::{inset_crop, render_inset, ClampMode, InsetParams, InsetRenderer};
pub use viewport::{render_viewport, ViewState, ViewportRenderer};

/// Colours and stroke settings shared by both renderers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderStyle {
    pub stroke_width: f32,
    pub pointer_radius: f32,
    pub show_annotations: bool,
    pub show_pointer: bool,
    pub background: Color,
    pub stroke_color: Color,
    pub label_color: Color,
    pub placeholder_color: Color,
    pub pointer_color: Color,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            stroke_width: DEFAULT_STROKE_WIDTH,
            pointer_radius: POINTER_INDICATOR_RADIUS,
            show_annotations: true,
            show_pointer: true,
            background: Color::gray(31),
            stroke_color: Color::YELLOW,
            label_color: Color::YELLOW,
            placeholder_color: Color::gray(160),
            pointer_color: Color::rgba(239, 68, 68, 128),
        }
    }
}

/// What a render pass ended up drawing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderStatus {
    /// Image and overlays were drawn.
    Drawn,
    /// The image is not ready; an indication was drawn instead.
    Placeholder,
    /// The surface has no area; nothing was drawn.
    SurfaceUnavailable,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SkippedAnnotation {
    pub index: usize,
    pub reason: String,
}

/// Outcome of one render pass. Renderers report problems here instead of
/// returning errors.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderReport {
    pub status: RenderStatus,
    pub annotations_drawn: usize,
    /// Well-formed annotations left out because they are not fully visible.
    pub annotations_hidden: usize,
    pub skipped: Vec<SkippedAnnotation>,
    /// Image region shown, for the inset.
    pub crop: Option<CropRegion>,
}

impl RenderReport {
    fn with_status(status: RenderStatus) -> Self {
        Self {
            status,
            annotations_drawn: 0,
            annotations_hidden: 0,
            skipped: Vec::new(),
            crop: None,
        }
    }

    pub fn is_drawn(&self) -> bool {
        self.status == RenderStatus::Drawn
    }
}

/// Identity of an image handle for redraw bookkeeping.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ImageKey {
    Empty,
    Loading(u64),
    Ready(u64),
    Failed,
}

impl ImageKey {
    pub(crate) fn of(handle: &ImageHandle) -> Self {
        match handle {
            ImageHandle::Empty => Self::Empty,
            ImageHandle::Loading { token, .. } => Self::Loading(token.value()),
            ImageHandle::Ready(image) => Self::Ready(image.id()),
            ImageHandle::Failed { .. } => Self::Failed,
        }
    }
}

/// Annotation set compared by reference for redraw bookkeeping. The key owns
/// a clone, so the allocation stays alive and its address cannot be reused by
/// a different set.
#[derive(Clone, Debug)]
pub(crate) struct AnnotationsKey(AnnotationSet);

impl AnnotationsKey {
    pub(crate) fn of(set: &AnnotationSet) -> Self {
        Self(set.clone())
    }
}

impl PartialEq for AnnotationsKey {
    fn eq(&self, other: &Self) -> bool {
        self.0.same_as(&other.0)
    }
}

/// Guard shared by both renderers. Returns the early report when the surface
/// or image cannot be drawn; the placeholder has already been painted.
fn precheck<S: Surface + ?Sized>(
    surface: &mut S,
    image: &ImageHandle,
    style: &RenderStyle,
) -> Result<SurfaceSize, RenderReport> {
    let size = surface.size();
    if !size.is_available() {
        warn!(
            width = size.width,
            height = size.height,
            "Surface unavailable, skipping draw"
        );
        return Err(RenderReport::with_status(RenderStatus::SurfaceUnavailable));
    }
    let message = match image {
        ImageHandle::Ready(_) => return Ok(size),
        ImageHandle::Empty => "No image",
        ImageHandle::Loading { .. } => "Loading image...",
        ImageHandle::Failed { .. } => "Image unavailable",
    };
    surface.draw_placeholder(message, style.background, style.placeholder_color);
    Err(RenderReport::with_status(RenderStatus::Placeholder))
}

/// Stroke one mapped annotation and put its label on the top-left corner.
fn draw_annotation<S: Surface + ?Sized>(
    surface: &mut S,
    annotation: &Annotation,
    rect: ScreenRect,
    style: &RenderStyle,
) {
    surface.stroke_rect(rect, style.stroke_color, style.stroke_width);
    if !annotation.label.is_empty() {
        surface.draw_label(
            ScreenPoint::new(rect.x, rect.y),
            &annotation.label,
            style.label_color,
        );
    }
}
