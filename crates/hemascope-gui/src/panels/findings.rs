use hemascope_core::case::{CaseData, CellCount, DETECTION_TYPE};

use crate::app::HemascopeApp;
use crate::panels::{key_value_grid, menu_bar, section_header};

const LEFT_PANEL_WIDTH: f32 = 260.0;

pub fn show(ctx: &egui::Context, app: &mut HemascopeApp) {
    egui::SidePanel::left("findings")
        .default_width(LEFT_PANEL_WIDTH)
        .resizable(true)
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.set_min_width(LEFT_PANEL_WIDTH - 20.0);

                let Some(case) = app.ui_state.case.as_ref() else {
                    ui.add_space(8.0);
                    ui.label("Open a case to see findings");
                    return;
                };

                summary_section(ui, case);
                ui.separator();
                details_section(ui, case);
                ui.separator();
                count_section(ui, "RBC", "rbc", &case.findings.rbc);
                ui.separator();
                count_section(ui, "WBC", "wbc", &case.findings.wbc);
                ui.separator();

                let platelets = &case.findings.platelets;
                section_header(ui, "Platelets", None);
                key_value_grid(
                    ui,
                    "platelets",
                    &[
                        ("Count", platelets.count.to_string()),
                        ("Percentage", platelets.percentage.clone()),
                    ],
                );
                ui.separator();

                if ui.button("Report").clicked() {
                    menu_bar::export_report(app);
                }
            });
        });
}

fn summary_section(ui: &mut egui::Ui, case: &CaseData) {
    section_header(ui, "Case", None);
    ui.add_space(4.0);
    key_value_grid(
        ui,
        "case_summary",
        &[
            ("Patient", case.patient_id.clone()),
            ("Sample", case.sample_type.clone()),
            ("File", case.filename.clone().unwrap_or_else(|| "-".into())),
            ("Detections", case.detection_count().to_string()),
        ],
    );
}

fn details_section(ui: &mut egui::Ui, case: &CaseData) {
    egui::CollapsingHeader::new("Finding Details")
        .default_open(true)
        .show(ui, |ui| {
            let confidence = case
                .confidence_score()
                .map(|score| format!("{score:.1}%"))
                .unwrap_or_else(|| "N/A".into());
            key_value_grid(
                ui,
                "finding_details",
                &[
                    ("Case ID", case.patient_id.clone()),
                    ("WSI ID", case.wsi_id.clone()),
                    ("Detection Type", DETECTION_TYPE.into()),
                    ("Confidence", confidence),
                ],
            );
        });
}

fn count_section(ui: &mut egui::Ui, title: &str, id: &str, rows: &[CellCount]) {
    let total: u32 = rows.iter().map(|r| r.count).sum();
    section_header(ui, title, Some(&format!("{total} cells")));
    ui.add_space(4.0);
    egui::Grid::new(id)
        .num_columns(3)
        .striped(true)
        .spacing([12.0, 4.0])
        .show(ui, |ui| {
            ui.small("Type");
            ui.small("Count");
            ui.small("%");
            ui.end_row();
            for row in rows {
                ui.label(&row.name);
                ui.monospace(row.count.to_string());
                ui.monospace(&row.percentage);
                ui.end_row();
            }
        });
}
