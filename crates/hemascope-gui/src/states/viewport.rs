use hemascope_core::render::{InsetRenderer, RenderReport, ViewportRenderer};

use crate::surface::SlideTexture;

/// Main view and inset display state.
pub struct ViewportState {
    pub texture: Option<SlideTexture>,
    pub renderer: ViewportRenderer,
    pub inset: InsetRenderer,
    /// Reports of the last pass that changed inputs; skipped annotations are
    /// logged once per change.
    pub last_report: Option<RenderReport>,
    pub last_inset_report: Option<RenderReport>,
    /// Pointer was inside the view on the previous frame.
    pub pointer_inside: bool,
}

impl ViewportState {
    pub fn new(inset: InsetRenderer) -> Self {
        Self {
            texture: None,
            renderer: ViewportRenderer::new(),
            inset,
            last_report: None,
            last_inset_report: None,
            pointer_inside: false,
        }
    }
}
