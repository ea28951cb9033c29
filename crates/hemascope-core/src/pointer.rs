//! Pointer controller for the main viewport.
//!
//! `Idle --down--> Dragging --move--> Dragging --up|leave--> Idle`. Every move
//! publishes a focus point; moves while dragging also accumulate pan.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::focus::{FocusPublisher, FocusSubscriber};
use crate::geometry::{
    to_normalized, FocusPoint, ImageSize, PanOffset, ScreenPoint, ScreenRect, ViewTransform,
};

/// Raw pointer input. Positions share one coordinate space with the viewport
/// bounds passed to [`PointerController::handle`] (e.g. window coordinates).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
    Down(ScreenPoint),
    Move(ScreenPoint),
    Up,
    Leave,
}

/// What the published focus point is a fraction of.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FocusMode {
    /// Fraction of the viewport bounding box.
    #[default]
    Surface,
    /// Fraction of the image under the pointer, through the view transform.
    Image,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DragState {
    Idle,
    Dragging { last: ScreenPoint },
}

/// Per-event view information supplied by the caller.
#[derive(Clone, Copy, Debug)]
pub struct PointerContext {
    /// Viewport bounding box, in event coordinates.
    pub bounds: ScreenRect,
    /// Current main-view zoom; pan deltas are divided by it.
    pub zoom: f32,
    /// Current view transform and image size, needed by [`FocusMode::Image`].
    pub view: Option<(ViewTransform, ImageSize)>,
}

impl PointerContext {
    pub fn new(bounds: ScreenRect, zoom: f32) -> Self {
        Self {
            bounds,
            zoom,
            view: None,
        }
    }

    pub fn with_view(mut self, transform: ViewTransform, image: ImageSize) -> Self {
        self.view = Some((transform, image));
        self
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerOutcome {
    /// Focus point published by this event. `None` only when the move could
    /// not be mapped (zero-area bounds).
    pub focus: Option<FocusPoint>,
    /// The published point differed from the previous one and bumped the
    /// channel revision.
    pub focus_changed: bool,
    pub pan_changed: bool,
}

/// Sole writer of the focus point and owner of the accumulated pan.
#[derive(Debug)]
pub struct PointerController {
    publisher: FocusPublisher,
    state: DragState,
    pan: PanOffset,
    mode: FocusMode,
    indicator: Option<FocusPoint>,
}

impl PointerController {
    pub fn new(publisher: FocusPublisher, mode: FocusMode) -> Self {
        Self {
            publisher,
            state: DragState::Idle,
            pan: PanOffset::ZERO,
            mode,
            indicator: None,
        }
    }

    pub fn subscribe(&self) -> FocusSubscriber {
        self.publisher.subscribe()
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    pub fn pan(&self) -> PanOffset {
        self.pan
    }

    pub fn reset_pan(&mut self) {
        self.pan = PanOffset::ZERO;
    }

    pub fn mode(&self) -> FocusMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: FocusMode) {
        self.mode = mode;
    }

    /// Last pointer position as a fraction of the viewport box, for the
    /// pointer indicator.
    pub fn indicator(&self) -> Option<FocusPoint> {
        self.indicator
    }

    pub fn handle(&mut self, event: PointerEvent, ctx: &PointerContext) -> PointerOutcome {
        match event {
            PointerEvent::Down(p) => {
                self.state = DragState::Dragging { last: p };
                PointerOutcome::default()
            }
            PointerEvent::Move(p) => self.handle_move(p, ctx),
            PointerEvent::Up | PointerEvent::Leave => {
                self.state = DragState::Idle;
                PointerOutcome::default()
            }
        }
    }

    fn handle_move(&mut self, p: ScreenPoint, ctx: &PointerContext) -> PointerOutcome {
        let mut outcome = PointerOutcome::default();
        let local = ScreenPoint::new(p.x - ctx.bounds.x, p.y - ctx.bounds.y);

        let surface_focus = to_normalized(local.x, local.y, ctx.bounds.width, ctx.bounds.height);
        self.indicator = surface_focus.or(self.indicator);

        let focus = match (self.mode, ctx.view) {
            (FocusMode::Image, Some((transform, image))) if !image.is_empty() => {
                let (ix, iy) = transform.screen_to_image(local);
                Some(FocusPoint::new(
                    ix / image.width_f32(),
                    iy / image.height_f32(),
                ))
            }
            _ => surface_focus,
        };
        if let Some(focus) = focus.map(FocusPoint::clamped) {
            outcome.focus = Some(focus);
            outcome.focus_changed = self.publisher.publish(focus).is_some();
        }

        if let DragState::Dragging { last } = self.state {
            let zoom = if ctx.zoom.is_finite() && ctx.zoom > 0.0 {
                ctx.zoom
            } else {
                1.0
            };
            let (dx, dy) = ((p.x - last.x) / zoom, (p.y - last.y) / zoom);
            self.pan = self.pan.translated(dx, dy);
            self.state = DragState::Dragging { last: p };
            outcome.pan_changed = dx != 0.0 || dy != 0.0;
            trace!(dx, dy, pan_x = self.pan.x, pan_y = self.pan.y, "Pan updated");
        }
        outcome
    }
}
