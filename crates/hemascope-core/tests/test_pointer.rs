use approx::assert_abs_diff_eq;

use hemascope_core::focus::focus_channel;
use hemascope_core::geometry::{
    FocusPoint, ImageSize, PanOffset, ScreenPoint, ScreenRect, SurfaceSize, ViewTransform,
};
use hemascope_core::pointer::{
    DragState, FocusMode, PointerContext, PointerController, PointerEvent,
};

fn controller(mode: FocusMode) -> PointerController {
    let (publisher, _) = focus_channel(FocusPoint::CENTER);
    PointerController::new(publisher, mode)
}

fn ctx(zoom: f32) -> PointerContext {
    PointerContext::new(ScreenRect::new(0.0, 0.0, 400.0, 200.0), zoom)
}

// ---------------------------------------------------------------------------
// Focus publishing
// ---------------------------------------------------------------------------

#[test]
fn test_move_publishes_normalized_focus() {
    let mut c = controller(FocusMode::Surface);
    let sub = c.subscribe();
    let out = c.handle(PointerEvent::Move(ScreenPoint::new(100.0, 150.0)), &ctx(1.0));
    assert_eq!(out.focus, Some(FocusPoint::new(0.25, 0.75)));
    assert!(out.focus_changed);
    assert!(!out.pan_changed);
    let snap = sub.latest();
    assert_eq!(snap.point, FocusPoint::new(0.25, 0.75));
    assert_eq!(snap.revision, 1);
}

#[test]
fn test_move_relative_to_bounds_origin() {
    let mut c = controller(FocusMode::Surface);
    let bounds = PointerContext::new(ScreenRect::new(50.0, 20.0, 100.0, 100.0), 1.0);
    let out = c.handle(PointerEvent::Move(ScreenPoint::new(100.0, 70.0)), &bounds);
    assert_eq!(out.focus, Some(FocusPoint::new(0.5, 0.5)));
}

#[test]
fn test_focus_is_clamped_outside_bounds() {
    let mut c = controller(FocusMode::Surface);
    let sub = c.subscribe();
    c.handle(PointerEvent::Move(ScreenPoint::new(-40.0, 500.0)), &ctx(1.0));
    assert_eq!(sub.latest().point, FocusPoint::new(0.0, 1.0));
}

#[test]
fn test_unchanged_focus_does_not_bump_revision() {
    let mut c = controller(FocusMode::Surface);
    let sub = c.subscribe();
    c.handle(PointerEvent::Move(ScreenPoint::new(10.0, 10.0)), &ctx(1.0));
    let out = c.handle(PointerEvent::Move(ScreenPoint::new(10.0, 10.0)), &ctx(1.0));
    assert_eq!(out.focus, Some(FocusPoint::new(0.025, 0.05)));
    assert!(!out.focus_changed);
    assert_eq!(sub.latest().revision, 1);
}

#[test]
fn test_move_onto_seed_point_still_reports_focus() {
    // The channel starts at the center, so this publish is not a change.
    let mut c = controller(FocusMode::Surface);
    let sub = c.subscribe();
    let out = c.handle(PointerEvent::Move(ScreenPoint::new(200.0, 100.0)), &ctx(1.0));
    assert_eq!(out.focus, Some(FocusPoint::CENTER));
    assert!(!out.focus_changed);
    assert_eq!(sub.latest().revision, 0);
}

#[test]
fn test_zero_bounds_publishes_nothing() {
    let mut c = controller(FocusMode::Surface);
    let sub = c.subscribe();
    let zero = PointerContext::new(ScreenRect::new(0.0, 0.0, 0.0, 0.0), 1.0);
    let out = c.handle(PointerEvent::Move(ScreenPoint::new(5.0, 5.0)), &zero);
    assert!(out.focus.is_none());
    assert!(!out.focus_changed);
    assert_eq!(sub.latest().revision, 0);
}

#[test]
fn test_image_mode_uses_view_transform() {
    let image = ImageSize::new(1000, 500);
    let surface = SurfaceSize::new(400.0, 200.0);
    let transform = ViewTransform::compose(image, surface, 2.0, PanOffset::ZERO).unwrap();
    let context = ctx(2.0).with_view(transform, image);

    let mut c = controller(FocusMode::Image);
    let out = c.handle(PointerEvent::Move(ScreenPoint::new(200.0, 100.0)), &context);
    let focus = out.focus.unwrap();
    assert_abs_diff_eq!(focus.u, 0.5, epsilon = 1e-4);
    assert_abs_diff_eq!(focus.v, 0.5, epsilon = 1e-4);

    // Quarter of the surface at 2x zoom is 3/8 of the image.
    let out = c.handle(PointerEvent::Move(ScreenPoint::new(100.0, 50.0)), &context);
    let focus = out.focus.unwrap();
    assert_abs_diff_eq!(focus.u, 0.375, epsilon = 1e-4);
    assert_abs_diff_eq!(focus.v, 0.375, epsilon = 1e-4);
    // The indicator still tracks the surface position.
    assert_eq!(c.indicator(), Some(FocusPoint::new(0.25, 0.25)));
}

#[test]
fn test_image_mode_without_view_falls_back_to_surface() {
    let mut c = controller(FocusMode::Image);
    let out = c.handle(PointerEvent::Move(ScreenPoint::new(200.0, 100.0)), &ctx(1.0));
    assert_eq!(out.focus, Some(FocusPoint::new(0.5, 0.5)));
}

// ---------------------------------------------------------------------------
// Dragging
// ---------------------------------------------------------------------------

#[test]
fn test_drag_accumulates_pan_divided_by_zoom() {
    let mut c = controller(FocusMode::Surface);
    let context = ctx(2.0);
    c.handle(PointerEvent::Down(ScreenPoint::new(100.0, 100.0)), &context);
    assert!(c.is_dragging());
    let out = c.handle(PointerEvent::Move(ScreenPoint::new(110.0, 90.0)), &context);
    assert!(out.pan_changed);
    assert_eq!(c.pan(), PanOffset::new(5.0, -5.0));
    c.handle(PointerEvent::Move(ScreenPoint::new(130.0, 90.0)), &context);
    assert_eq!(c.pan(), PanOffset::new(15.0, -5.0));
    assert_eq!(
        c.state(),
        DragState::Dragging {
            last: ScreenPoint::new(130.0, 90.0)
        }
    );
}

#[test]
fn test_pan_unchanged_while_idle() {
    let mut c = controller(FocusMode::Surface);
    c.handle(PointerEvent::Move(ScreenPoint::new(10.0, 10.0)), &ctx(1.0));
    c.handle(PointerEvent::Move(ScreenPoint::new(90.0, 50.0)), &ctx(1.0));
    assert_eq!(c.pan(), PanOffset::ZERO);
}

#[test]
fn test_up_and_leave_end_drag() {
    let mut c = controller(FocusMode::Surface);
    let context = ctx(1.0);
    c.handle(PointerEvent::Down(ScreenPoint::new(0.0, 0.0)), &context);
    c.handle(PointerEvent::Up, &context);
    assert_eq!(c.state(), DragState::Idle);
    c.handle(PointerEvent::Move(ScreenPoint::new(50.0, 50.0)), &context);
    assert_eq!(c.pan(), PanOffset::ZERO);

    c.handle(PointerEvent::Down(ScreenPoint::new(0.0, 0.0)), &context);
    c.handle(PointerEvent::Leave, &context);
    assert!(!c.is_dragging());
}

#[test]
fn test_repress_does_not_jump() {
    let mut c = controller(FocusMode::Surface);
    let context = ctx(1.0);
    c.handle(PointerEvent::Down(ScreenPoint::new(0.0, 0.0)), &context);
    c.handle(PointerEvent::Move(ScreenPoint::new(10.0, 0.0)), &context);
    c.handle(PointerEvent::Up, &context);
    // Press far away: the first move measures from the new press point.
    c.handle(PointerEvent::Down(ScreenPoint::new(300.0, 100.0)), &context);
    c.handle(PointerEvent::Move(ScreenPoint::new(305.0, 100.0)), &context);
    assert_eq!(c.pan(), PanOffset::new(15.0, 0.0));
}

#[test]
fn test_invalid_zoom_pans_unscaled() {
    let mut c = controller(FocusMode::Surface);
    let context = ctx(0.0);
    c.handle(PointerEvent::Down(ScreenPoint::new(0.0, 0.0)), &context);
    c.handle(PointerEvent::Move(ScreenPoint::new(8.0, 4.0)), &context);
    assert_eq!(c.pan(), PanOffset::new(8.0, 4.0));
}

#[test]
fn test_reset_pan() {
    let mut c = controller(FocusMode::Surface);
    let context = ctx(1.0);
    c.handle(PointerEvent::Down(ScreenPoint::new(0.0, 0.0)), &context);
    c.handle(PointerEvent::Move(ScreenPoint::new(8.0, 4.0)), &context);
    c.reset_pan();
    assert_eq!(c.pan(), PanOffset::ZERO);
}

// ---------------------------------------------------------------------------
// Focus channel
// ---------------------------------------------------------------------------

#[test]
fn test_focus_channel_revisions() {
    let (publisher, subscriber) = focus_channel(FocusPoint::CENTER);
    assert_eq!(subscriber.latest().revision, 0);
    assert!(subscriber.changed_since(0).is_none());

    assert_eq!(publisher.publish(FocusPoint::new(0.1, 0.2)), Some(1));
    assert_eq!(publisher.publish(FocusPoint::new(0.1, 0.2)), None);
    let snap = subscriber.changed_since(0).unwrap();
    assert_eq!(snap.point, FocusPoint::new(0.1, 0.2));
    assert!(subscriber.changed_since(snap.revision).is_none());
}

#[test]
fn test_focus_channel_many_readers() {
    let (publisher, subscriber) = focus_channel(FocusPoint::CENTER);
    let other = subscriber.clone();
    let third = publisher.subscribe();
    publisher.publish(FocusPoint::new(0.9, 0.1));
    assert_eq!(subscriber.latest(), other.latest());
    assert_eq!(third.latest().point, publisher.current());
}

#[test]
fn test_focus_channel_across_threads() {
    let (publisher, subscriber) = focus_channel(FocusPoint::CENTER);
    let reader = std::thread::spawn(move || {
        let mut seen = 0;
        while seen < 3 {
            if let Some(snap) = subscriber.changed_since(seen) {
                seen = snap.revision;
            }
            std::thread::yield_now();
        }
        subscriber.latest().point
    });
    for i in 1..=3 {
        publisher.publish(FocusPoint::new(i as f32 * 0.1, 0.5));
    }
    let last = reader.join().unwrap();
    assert_abs_diff_eq!(last.u, 0.3, epsilon = 1e-6);
}
