use std::sync::mpsc;
use std::time::{Duration, Instant};

use hemascope_core::annotation::AnnotationSet;
use hemascope_core::config::ViewerConfig;
use hemascope_core::focus::focus_channel;
use hemascope_core::geometry::FocusPoint;
use hemascope_core::image_handle::{ImageHandle, ImageLoader, SlideImage};
use hemascope_core::pointer::PointerController;
use hemascope_core::render::InsetRenderer;
use hemascope_core::zoom::ZoomControl;
use tracing::{error, warn};

use crate::convert::slide_to_color_image;
use crate::messages::{WorkerCommand, WorkerResult};
use crate::panels;
use crate::states::{UIState, ViewportState};
use crate::surface::SlideTexture;
use crate::worker;

/// Repaint interval while an image request is pending, so timeouts fire
/// without user input.
const LOADING_REPAINT: Duration = Duration::from_millis(250);

pub struct HemascopeApp {
    pub cmd_tx: mpsc::Sender<WorkerCommand>,
    pub result_tx: mpsc::Sender<WorkerResult>,
    pub result_rx: mpsc::Receiver<WorkerResult>,
    pub ui_state: UIState,
    pub viewport: ViewportState,
    pub config: ViewerConfig,
    pub loader: ImageLoader,
    pub pointer: PointerController,
    pub zoom: ZoomControl,
    /// Drawn when no case is open. Kept here so the redraw check sees the
    /// same set every frame.
    pub empty_annotations: AnnotationSet,
}

impl HemascopeApp {
    pub fn new(ctx: &egui::Context, config: ViewerConfig) -> Self {
        let (result_tx, result_rx) = mpsc::channel();
        let cmd_tx = match worker::spawn_worker(result_tx.clone(), ctx.clone()) {
            Ok(tx) => tx,
            Err(e) => {
                error!(error = %e, "Failed to spawn worker thread");
                // Commands go nowhere; the UI still runs.
                mpsc::channel().0
            }
        };

        let (publisher, _) = focus_channel(FocusPoint::CENTER);
        let pointer = PointerController::new(publisher, config.focus_mode);
        let inset = InsetRenderer::new(pointer.subscribe());
        let zoom = ZoomControl::new(config.zoom).unwrap_or_else(|e| {
            warn!(error = %e, "Invalid zoom settings, using defaults");
            ZoomControl::default()
        });

        ctx.set_theme(egui::Theme::Dark);

        Self {
            cmd_tx,
            result_tx,
            result_rx,
            ui_state: UIState::new(),
            viewport: ViewportState::new(inset),
            loader: ImageLoader::with_timeout(config.load_timeout()),
            config,
            pointer,
            zoom,
            empty_annotations: AnnotationSet::empty(),
        }
    }

    /// Drain all pending results from the worker.
    fn poll_results(&mut self, ctx: &egui::Context) {
        while let Ok(result) = self.result_rx.try_recv() {
            match result {
                WorkerResult::CaseLoaded { path, case } => {
                    self.ui_state.add_log(format!(
                        "Opened: {} ({}, {} detections)",
                        path.display(),
                        case.patient_id,
                        case.detection_count()
                    ));
                    match case.image_path() {
                        Ok(image) => {
                            let image = image.to_path_buf();
                            let token = self.loader.request(image.display().to_string());
                            self.send_command(WorkerCommand::DecodeImage { token, path: image });
                            self.ui_state.busy = true;
                        }
                        Err(e) => {
                            let token = self.loader.request(path.display().to_string());
                            self.loader.complete(token, Err(e));
                            self.ui_state.busy = false;
                        }
                    }
                    self.viewport.texture = None;
                    self.reset_view();
                    self.ui_state.case = Some(*case);
                    self.ui_state.case_path = Some(path);
                }
                WorkerResult::ImageDecoded { token, result } => {
                    if self.loader.complete(token, result) {
                        self.ui_state.busy = false;
                        self.on_image_settled(ctx);
                    }
                }
                WorkerResult::ReportSaved { path } => {
                    self.ui_state.add_log(format!("Report saved: {}", path.display()));
                }
                WorkerResult::ConfigImported { path, config } => {
                    self.apply_config(*config);
                    self.ui_state
                        .add_log(format!("Config imported: {}", path.display()));
                }
                WorkerResult::Error { message } => {
                    self.ui_state.busy = false;
                    self.ui_state.add_log(format!("ERROR: {message}"));
                }
                WorkerResult::Log { message } => {
                    self.ui_state.add_log(message);
                }
            }
        }
    }

    /// Upload the texture for a ready image, or log why there is none.
    fn on_image_settled(&mut self, ctx: &egui::Context) {
        match self.loader.handle() {
            ImageHandle::Ready(slide) => {
                let size = slide.size();
                self.viewport.texture = Some(upload_texture(ctx, slide));
                self.ui_state
                    .add_log(format!("Image ready ({}x{})", size.width, size.height));
            }
            ImageHandle::Failed { source, message } => {
                let line = format!("ERROR: {source}: {message}");
                self.viewport.texture = None;
                self.ui_state.add_log(line);
            }
            _ => {}
        }
    }

    /// Back to the fitted view: zero pan, initial zoom.
    pub fn reset_view(&mut self) {
        self.pointer.reset_pan();
        self.zoom.reset();
    }

    /// Replace the active settings. The detection filter takes effect on the
    /// next case opened.
    pub fn apply_config(&mut self, config: ViewerConfig) {
        self.pointer.set_mode(config.focus_mode);
        self.loader.set_timeout(config.load_timeout());
        match ZoomControl::new(config.zoom) {
            Ok(mut zoom) => {
                zoom.set(self.zoom.zoom());
                self.zoom = zoom;
            }
            Err(e) => warn!(error = %e, "Imported zoom settings rejected"),
        }
        self.viewport.renderer.invalidate();
        self.config = config;
    }

    pub fn set_dark_mode(&mut self, ctx: &egui::Context, dark: bool) {
        self.ui_state.dark_mode = dark;
        ctx.set_theme(if dark {
            egui::Theme::Dark
        } else {
            egui::Theme::Light
        });
    }

    pub fn send_command(&self, cmd: WorkerCommand) {
        let _ = self.cmd_tx.send(cmd);
    }
}

fn upload_texture(ctx: &egui::Context, slide: &SlideImage) -> SlideTexture {
    let max_side = ctx.input(|i| i.max_texture_side);
    let image = slide_to_color_image(slide, max_side);
    SlideTexture {
        slide_id: slide.id(),
        handle: ctx.load_texture("slide", image, egui::TextureOptions::LINEAR),
    }
}

impl eframe::App for HemascopeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_results(ctx);

        if self.loader.expire(Instant::now()) {
            self.ui_state.busy = false;
            self.on_image_settled(ctx);
        }
        if self.loader.handle().is_loading() {
            ctx.request_repaint_after(LOADING_REPAINT);
        }

        panels::menu_bar::show(ctx, self);
        panels::status::show(ctx, self);
        panels::findings::show(ctx, self);
        panels::hub::show(ctx, self);
        panels::viewport::show(ctx, self);

        if self.ui_state.show_about {
            egui::Window::new("About Hemascope")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.heading("Hemascope");
                        ui.label("Blood Smear Slide Viewer");
                        ui.add_space(8.0);
                        ui.label(format!("Version {}", env!("CARGO_PKG_VERSION")));
                        ui.add_space(8.0);
                        if ui.button("Close").clicked() {
                            self.ui_state.show_about = false;
                        }
                    });
                });
        }
    }
}
