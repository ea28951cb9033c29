mod app;
mod convert;
mod messages;
mod panels;
mod states;
mod surface;
mod worker;

use std::path::PathBuf;

use clap::Parser;
use hemascope_core::config::ViewerConfig;

#[derive(Parser)]
#[command(name = "hemascope-gui", version, about = "Whole slide image viewer")]
struct Args {
    /// Viewer configuration (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();
    let config = match args.config {
        Some(path) => match ViewerConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!(
                    path = %path.display(),
                    error = %e,
                    "Failed to load config, using defaults"
                );
                ViewerConfig::default()
            }
        },
        None => ViewerConfig::default(),
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 860.0])
            .with_min_inner_size([900.0, 600.0])
            .with_title("Hemascope"),
        ..Default::default()
    };

    eframe::run_native(
        "Hemascope",
        options,
        Box::new(|cc| Ok(Box::new(app::HemascopeApp::new(&cc.egui_ctx, config)))),
    )
}
