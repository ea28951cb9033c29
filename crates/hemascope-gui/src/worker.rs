use std::sync::mpsc;

use hemascope_core::case::CaseData;
use hemascope_core::image_handle::decode_image;
use hemascope_core::report::write_report;
use tracing::debug;

use crate::messages::{WorkerCommand, WorkerResult};

/// Spawn the worker thread. Returns the command sender.
pub fn spawn_worker(
    result_tx: mpsc::Sender<WorkerResult>,
    ctx: egui::Context,
) -> std::io::Result<mpsc::Sender<WorkerCommand>> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<WorkerCommand>();

    std::thread::Builder::new()
        .name("hemascope-worker".into())
        .spawn(move || {
            worker_loop(cmd_rx, result_tx, ctx);
        })?;

    Ok(cmd_tx)
}

pub(crate) fn send(tx: &mpsc::Sender<WorkerResult>, ctx: &egui::Context, result: WorkerResult) {
    let _ = tx.send(result);
    ctx.request_repaint();
}

pub(crate) fn send_log(
    tx: &mpsc::Sender<WorkerResult>,
    ctx: &egui::Context,
    msg: impl Into<String>,
) {
    send(
        tx,
        ctx,
        WorkerResult::Log {
            message: msg.into(),
        },
    );
}

pub(crate) fn send_error(
    tx: &mpsc::Sender<WorkerResult>,
    ctx: &egui::Context,
    msg: impl Into<String>,
) {
    send(
        tx,
        ctx,
        WorkerResult::Error {
            message: msg.into(),
        },
    );
}

fn worker_loop(
    cmd_rx: mpsc::Receiver<WorkerCommand>,
    tx: mpsc::Sender<WorkerResult>,
    ctx: egui::Context,
) {
    while let Ok(cmd) = cmd_rx.recv() {
        match cmd {
            WorkerCommand::LoadCase { path, filter } => match CaseData::load(&path, &filter) {
                Ok(case) => send(
                    &tx,
                    &ctx,
                    WorkerResult::CaseLoaded {
                        path,
                        case: Box::new(case),
                    },
                ),
                Err(e) => send_error(&tx, &ctx, format!("Failed to open {}: {e}", path.display())),
            },
            WorkerCommand::DecodeImage { token, path } => {
                debug!(token = token.value(), path = %path.display(), "Decoding image");
                send_log(&tx, &ctx, format!("Decoding {}", path.display()));
                let result = decode_image(&path);
                send(&tx, &ctx, WorkerResult::ImageDecoded { token, result });
            }
            WorkerCommand::ExportReport { case, path, format } => {
                match write_report(&case, format, &path) {
                    Ok(()) => send(&tx, &ctx, WorkerResult::ReportSaved { path }),
                    Err(e) => send_error(
                        &tx,
                        &ctx,
                        format!("Failed to write report {}: {e}", path.display()),
                    ),
                }
            }
        }
    }
}
