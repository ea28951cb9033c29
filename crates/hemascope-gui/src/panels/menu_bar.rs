use hemascope_core::config::ViewerConfig;
use hemascope_core::report::ReportFormat;

use crate::app::HemascopeApp;
use crate::messages::{WorkerCommand, WorkerResult};
use crate::worker;

const OPEN_SHORTCUT: egui::KeyboardShortcut =
    egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::O);
const EXPORT_SHORTCUT: egui::KeyboardShortcut =
    egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::E);
const QUIT_SHORTCUT: egui::KeyboardShortcut =
    egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::Q);

pub fn show(ctx: &egui::Context, app: &mut HemascopeApp) {
    egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
        egui::MenuBar::new().ui(ui, |ui| {
            ui.menu_button("File", |ui| {
                if ui
                    .add(
                        egui::Button::new("Open Case...")
                            .shortcut_text(ctx.format_shortcut(&OPEN_SHORTCUT)),
                    )
                    .clicked()
                {
                    ui.close();
                    open_case(app);
                }

                let has_case = app.ui_state.case.is_some();
                if ui
                    .add_enabled(
                        has_case,
                        egui::Button::new("Export Report...")
                            .shortcut_text(ctx.format_shortcut(&EXPORT_SHORTCUT)),
                    )
                    .clicked()
                {
                    ui.close();
                    export_report(app);
                }

                ui.separator();

                if ui.button("Import Config...").clicked() {
                    ui.close();
                    import_config(ctx, app);
                }

                if ui.button("Export Config...").clicked() {
                    ui.close();
                    export_config(ctx, app);
                }

                ui.separator();

                if ui
                    .add(
                        egui::Button::new("Quit")
                            .shortcut_text(ctx.format_shortcut(&QUIT_SHORTCUT)),
                    )
                    .clicked()
                {
                    ui.close();
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
            });

            ui.menu_button("View", |ui| {
                ui.checkbox(&mut app.config.style.show_annotations, "Annotations");
                ui.checkbox(&mut app.config.style.show_pointer, "Pointer indicator");
                ui.separator();
                if ui.button("Reset View").clicked() {
                    ui.close();
                    app.reset_view();
                }
            });

            ui.menu_button("Help", |ui| {
                if ui.button("About").clicked() {
                    ui.close();
                    app.ui_state.show_about = true;
                }
            });

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let dark = app.ui_state.dark_mode;
                let label = if dark { "Light mode" } else { "Dark mode" };
                if ui.button(label).clicked() {
                    app.set_dark_mode(ctx, !dark);
                }
            });
        });

        // Keyboard shortcuts (consumed outside menus)
        if ctx.input_mut(|i| i.consume_shortcut(&OPEN_SHORTCUT)) {
            open_case(app);
        }
        let export = ctx.input_mut(|i| i.consume_shortcut(&EXPORT_SHORTCUT));
        if export && app.ui_state.case.is_some() {
            export_report(app);
        }
        if ctx.input_mut(|i| i.consume_shortcut(&QUIT_SHORTCUT)) {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
    });
}

fn open_case(app: &mut HemascopeApp) {
    let cmd_tx = app.cmd_tx.clone();
    let filter = app.config.detection_filter;
    std::thread::spawn(move || {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Case JSON", &["json"])
            .add_filter("All files", &["*"])
            .pick_file()
        {
            let _ = cmd_tx.send(WorkerCommand::LoadCase { path, filter });
        }
    });
}

/// Ask for a destination and hand the current case to the worker. The format
/// follows the chosen extension.
pub(crate) fn export_report(app: &mut HemascopeApp) {
    let Some(case) = app.ui_state.case.clone() else {
        return;
    };
    let cmd_tx = app.cmd_tx.clone();
    let file_name = format!("{}_report.txt", case.patient_id);
    std::thread::spawn(move || {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Text", &["txt"])
            .add_filter("JSON", &["json"])
            .add_filter("CSV", &["csv"])
            .add_filter("PDF", &["pdf"])
            .set_file_name(file_name)
            .save_file()
        {
            let format = ReportFormat::from_path(&path);
            let _ = cmd_tx.send(WorkerCommand::ExportReport {
                case: Box::new(case),
                path,
                format,
            });
        }
    });
}

fn import_config(ctx: &egui::Context, app: &mut HemascopeApp) {
    let result_tx = app.result_tx.clone();
    let ctx = ctx.clone();
    std::thread::spawn(move || {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("TOML", &["toml"])
            .pick_file()
        else {
            return;
        };
        match ViewerConfig::load(&path) {
            Ok(config) => worker::send(
                &result_tx,
                &ctx,
                WorkerResult::ConfigImported {
                    path,
                    config: Box::new(config),
                },
            ),
            Err(e) => worker::send_error(
                &result_tx,
                &ctx,
                format!("Failed to import {}: {e}", path.display()),
            ),
        }
    });
}

fn export_config(ctx: &egui::Context, app: &mut HemascopeApp) {
    let config = app.config.clone();
    let result_tx = app.result_tx.clone();
    let ctx = ctx.clone();
    std::thread::spawn(move || {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("TOML", &["toml"])
            .set_file_name("hemascope.toml")
            .save_file()
        else {
            return;
        };
        match config.save(&path) {
            Ok(()) => worker::send_log(
                &result_tx,
                &ctx,
                format!("Config exported: {}", path.display()),
            ),
            Err(e) => worker::send_error(
                &result_tx,
                &ctx,
                format!("Failed to export {}: {e}", path.display()),
            ),
        }
    });
}
