mod commands;
mod summary;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use hemascope_core::config::ViewerConfig;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hemascope", about = "Blood smear slide viewer and report tool")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Viewer config file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show case metadata, findings and image size
    Info(commands::info::InfoArgs),
    /// Render the main view and the zoomed inset to PNG
    Render(commands::render::RenderArgs),
    /// Export the detection report
    Report(commands::report::ReportArgs),
    /// Print or save the default viewer config
    Config(commands::config::ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = match &cli.config {
        Some(path) => ViewerConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ViewerConfig::default(),
    };

    match &cli.command {
        Commands::Info(args) => commands::info::run(args, &config),
        Commands::Render(args) => commands::render::run(args, &config),
        Commands::Report(args) => commands::report::run(args, &config),
        Commands::Config(args) => commands::config::run(args),
    }
}
