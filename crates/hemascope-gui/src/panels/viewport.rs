use hemascope_core::case::CaseData;
use hemascope_core::geometry::{ScreenPoint, ScreenRect};
use hemascope_core::pointer::{FocusMode, PointerContext, PointerEvent};
use hemascope_core::render::ViewState;
use hemascope_core::surface::Surface;

use crate::app::HemascopeApp;
use crate::surface::EguiSurface;

/// Scroll distance per zoom step.
const SCROLL_PER_STEP: f32 = 50.0;

pub fn show(ctx: &egui::Context, app: &mut HemascopeApp) {
    egui::CentralPanel::default().show(ctx, |ui| {
        toolbar(ui, app);
        ui.separator();

        let rect = ui.available_rect_before_wrap();
        let response = ui.allocate_rect(rect, egui::Sense::click_and_drag());

        handle_zoom(ui, &response, app);
        if response.double_clicked() {
            app.reset_view();
        }
        handle_pointer(ui, &response, rect, app);
        draw(ui, rect, app);
    });
}

fn toolbar(ui: &mut egui::Ui, app: &mut HemascopeApp) {
    ui.horizontal(|ui| {
        let range = app.zoom.range();
        if ui.small_button("-").clicked() {
            app.zoom.zoom_out();
        }
        let mut zoom = app.zoom.zoom();
        if ui
            .add(
                egui::Slider::new(&mut zoom, range.min..=range.max)
                    .text("Zoom")
                    .fixed_decimals(1)
                    .suffix("x"),
            )
            .changed()
        {
            app.zoom.set(zoom);
        }
        if ui.small_button("+").clicked() {
            app.zoom.zoom_in();
        }
        if ui.button("Reset").clicked() {
            app.reset_view();
        }

        ui.separator();
        ui.checkbox(&mut app.config.style.show_annotations, "Annotations");

        ui.separator();
        let mut mode = app.pointer.mode();
        egui::ComboBox::from_label("Focus")
            .selected_text(mode_name(mode))
            .show_ui(ui, |ui| {
                for choice in [FocusMode::Surface, FocusMode::Image] {
                    ui.selectable_value(&mut mode, choice, mode_name(choice));
                }
            });
        if mode != app.pointer.mode() {
            app.pointer.set_mode(mode);
            app.config.focus_mode = mode;
        }
    });
}

fn mode_name(mode: FocusMode) -> &'static str {
    match mode {
        FocusMode::Surface => "View",
        FocusMode::Image => "Image",
    }
}

fn handle_zoom(ui: &egui::Ui, response: &egui::Response, app: &mut HemascopeApp) {
    let scroll = ui.input(|i| i.smooth_scroll_delta.y);
    if scroll == 0.0 || !response.hovered() {
        return;
    }
    let target = app.zoom.zoom() + scroll / SCROLL_PER_STEP * app.zoom.step();
    app.zoom.set(target);
}

fn to_screen(p: egui::Pos2) -> ScreenPoint {
    ScreenPoint::new(p.x, p.y)
}

fn pointer_context(app: &HemascopeApp, rect: egui::Rect) -> PointerContext {
    let bounds = ScreenRect::new(rect.min.x, rect.min.y, rect.width(), rect.height());
    let zoom = app.zoom.zoom();
    let ctx = PointerContext::new(bounds, zoom);
    let Some(slide) = app.loader.handle().ready() else {
        return ctx;
    };
    let view = ViewState {
        zoom,
        pan: app.pointer.pan(),
        pointer: None,
    };
    match view.transform(slide.size(), bounds.size()) {
        Some(transform) => ctx.with_view(transform, slide.size()),
        None => ctx,
    }
}

/// Feed egui pointer input to the controller in event coordinates.
fn handle_pointer(
    ui: &egui::Ui,
    response: &egui::Response,
    rect: egui::Rect,
    app: &mut HemascopeApp,
) {
    let ctx = pointer_context(app, rect);

    if response.drag_started_by(egui::PointerButton::Primary) {
        if let Some(origin) = ui.input(|i| i.pointer.press_origin()) {
            app.pointer.handle(PointerEvent::Down(to_screen(origin)), &ctx);
        }
    }

    let inside = ui
        .input(|i| i.pointer.latest_pos())
        .filter(|p| rect.contains(*p));
    match inside {
        Some(pos) => {
            app.pointer.handle(PointerEvent::Move(to_screen(pos)), &ctx);
            app.viewport.pointer_inside = true;
        }
        None if app.viewport.pointer_inside => {
            app.pointer.handle(PointerEvent::Leave, &ctx);
            app.viewport.pointer_inside = false;
        }
        None => {}
    }

    if response.drag_stopped() {
        app.pointer.handle(PointerEvent::Up, &ctx);
    }
}

fn draw(ui: &egui::Ui, rect: egui::Rect, app: &mut HemascopeApp) {
    let HemascopeApp {
        ui_state,
        viewport,
        config,
        loader,
        pointer,
        zoom,
        empty_annotations,
        ..
    } = app;
    let annotations = ui_state
        .case
        .as_ref()
        .map(CaseData::annotations)
        .unwrap_or(&*empty_annotations);
    let view = ViewState {
        zoom: zoom.zoom(),
        pan: pointer.pan(),
        pointer: pointer.indicator().filter(|_| viewport.pointer_inside),
    };

    let mut surface = EguiSurface::new(ui, rect, viewport.texture.as_ref());
    let size = surface.size();
    let changed = viewport
        .renderer
        .needs_redraw(loader.handle(), annotations, size, &view, &config.style);
    let report = viewport
        .renderer
        .render(&mut surface, loader.handle(), annotations, &view, &config.style);

    if changed && viewport.last_report.as_ref().map(|r| &r.skipped) != Some(&report.skipped) {
        for skipped in &report.skipped {
            ui_state.add_log(format!(
                "Annotation #{} skipped: {}",
                skipped.index, skipped.reason
            ));
        }
    }
    if changed {
        viewport.last_report = Some(report);
    }
}
