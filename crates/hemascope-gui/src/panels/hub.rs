use hemascope_core::case::CaseData;
use hemascope_core::render::ClampMode;

use crate::app::HemascopeApp;
use crate::panels::{key_value_grid, section_header};
use crate::surface::EguiSurface;

const RIGHT_PANEL_WIDTH: f32 = 240.0;
const MAX_INSET_ZOOM: f32 = 10.0;

/// Right panel: magnified inset around the focus point and patient metadata.
pub fn show(ctx: &egui::Context, app: &mut HemascopeApp) {
    egui::SidePanel::right("hub")
        .default_width(RIGHT_PANEL_WIDTH)
        .resizable(true)
        .show(ctx, |ui| {
            section_header(
                ui,
                "Hub",
                Some(&format!("{:.1}x", app.config.inset.zoom)),
            );
            ui.add_space(4.0);

            inset_view(ui, app);
            ui.add_space(4.0);
            inset_controls(ui, app);
            ui.separator();

            section_header(ui, "Patient", None);
            match app.ui_state.case.as_ref() {
                Some(case) => patient_grid(ui, case),
                None => {
                    ui.label("No case loaded");
                }
            }
        });
}

fn inset_view(ui: &mut egui::Ui, app: &mut HemascopeApp) {
    let size = app.config.inset.size();
    let (rect, _) = ui.allocate_exact_size(
        egui::vec2(size.width, size.height),
        egui::Sense::hover(),
    );

    let HemascopeApp {
        ui_state,
        viewport,
        config,
        loader,
        empty_annotations,
        ..
    } = app;
    let annotations = ui_state
        .case
        .as_ref()
        .map(CaseData::annotations)
        .unwrap_or(&*empty_annotations);
    let params = config.inset.params();

    let changed = viewport
        .inset
        .needs_redraw(loader.handle(), annotations, size, &params, &config.style);
    let mut surface = EguiSurface::new(ui, rect, viewport.texture.as_ref());
    let report = viewport
        .inset
        .render(&mut surface, loader.handle(), annotations, &params, &config.style);
    if changed {
        viewport.last_inset_report = Some(report);
    }

    let focus = viewport.inset.focus();
    let crop = viewport
        .last_inset_report
        .as_ref()
        .and_then(|r| r.crop)
        .map(|c| format!("{:.0},{:.0} {:.0}x{:.0}", c.x, c.y, c.width, c.height))
        .unwrap_or_else(|| "-".into());
    let shown = viewport
        .last_inset_report
        .as_ref()
        .map(|r| format!("{} shown, {} hidden", r.annotations_drawn, r.annotations_hidden))
        .unwrap_or_else(|| "-".into());
    key_value_grid(
        ui,
        "inset_info",
        &[
            ("Focus", format!("{:.3}, {:.3}", focus.u, focus.v)),
            ("Crop", crop),
            ("Boxes", shown),
        ],
    );
}

fn inset_controls(ui: &mut egui::Ui, app: &mut HemascopeApp) {
    ui.add(
        egui::Slider::new(&mut app.config.inset.zoom, 1.0..=MAX_INSET_ZOOM)
            .text("Magnification")
            .fixed_decimals(1),
    );
    let mut clamped = app.config.inset.clamp == ClampMode::Clamped;
    if ui.checkbox(&mut clamped, "Keep crop inside image").changed() {
        app.config.inset.clamp = if clamped {
            ClampMode::Clamped
        } else {
            ClampMode::Unclamped
        };
    }
}

fn patient_grid(ui: &mut egui::Ui, case: &CaseData) {
    key_value_grid(
        ui,
        "patient",
        &[
            ("ID", case.patient_id.clone()),
            ("Sample", case.sample_type.clone()),
            ("File", case.filename.clone().unwrap_or_else(|| "-".into())),
        ],
    );
}
