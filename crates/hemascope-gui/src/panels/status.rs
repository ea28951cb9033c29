use hemascope_core::image_handle::ImageHandle;

use crate::app::HemascopeApp;

pub fn show(ctx: &egui::Context, app: &mut HemascopeApp) {
    egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
        ui.add_space(2.0);

        // Log area, fixed height for 4 lines, scrollable.
        let line_height = ui.text_style_height(&egui::TextStyle::Body);
        let spacing = ui.spacing().item_spacing.y;
        let log_height = line_height * 4.0 + spacing * 3.0;

        egui::ScrollArea::vertical()
            .max_height(log_height)
            .min_scrolled_height(log_height)
            .stick_to_bottom(true)
            .show(ui, |ui| {
                if app.ui_state.log_messages.is_empty() {
                    // Reserve space for 4 empty lines to prevent layout jump.
                    for _ in 0..4 {
                        ui.label("");
                    }
                } else {
                    for msg in &app.ui_state.log_messages {
                        ui.label(msg);
                    }
                }
            });

        ui.horizontal(|ui| {
            if app.ui_state.busy {
                ui.spinner();
            }
            match app.loader.handle() {
                ImageHandle::Empty => {
                    ui.label("No image");
                }
                ImageHandle::Loading { source, .. } => {
                    ui.label(format!("Loading {source}"));
                }
                ImageHandle::Ready(slide) => {
                    let size = slide.size();
                    ui.label(format!("{}x{}", size.width, size.height));
                }
                ImageHandle::Failed { message, .. } => {
                    ui.colored_label(
                        ui.visuals().error_fg_color,
                        format!("Image failed: {message}"),
                    );
                }
            }
            ui.separator();
            ui.label(format!("Zoom: {:.0}%", app.zoom.zoom() * 100.0));
            ui.separator();
            let pan = app.pointer.pan();
            ui.label(format!("Pan: {:.0}, {:.0}", pan.x, pan.y));
            ui.separator();
            let focus = app.viewport.inset.focus();
            ui.label(format!("Focus: {:.3}, {:.3}", focus.u, focus.v));
        });

        ui.add_space(2.0);
    });
}
