use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use hemascope_core::case::CaseData;
use hemascope_core::config::ViewerConfig;
use hemascope_core::report::{render_report, write_report, ReportFormat};

#[derive(Clone, Copy, ValueEnum)]
pub enum ReportFormatArg {
    Text,
    Json,
    Csv,
    Pdf,
}

impl From<ReportFormatArg> for ReportFormat {
    fn from(arg: ReportFormatArg) -> Self {
        match arg {
            ReportFormatArg::Text => ReportFormat::Text,
            ReportFormatArg::Json => ReportFormat::Json,
            ReportFormatArg::Csv => ReportFormat::Csv,
            ReportFormatArg::Pdf => ReportFormat::Pdf,
        }
    }
}

#[derive(Args)]
pub struct ReportArgs {
    /// Case file (JSON)
    pub case: PathBuf,

    /// Output format; inferred from the output extension when omitted
    #[arg(long, value_enum)]
    pub format: Option<ReportFormatArg>,

    /// Write the report to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run(args: &ReportArgs, config: &ViewerConfig) -> Result<()> {
    let case = CaseData::load(&args.case, &config.detection_filter)
        .with_context(|| format!("Failed to load case {}", args.case.display()))?;

    match args.output {
        Some(ref path) => {
            let format = args
                .format
                .map(ReportFormat::from)
                .unwrap_or_else(|| ReportFormat::from_path(path));
            write_report(&case, format, path)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            println!("{} report saved to {}", format, path.display());
        }
        None => {
            let format = args.format.map(ReportFormat::from).unwrap_or_default();
            if format.is_binary() && console::Term::stdout().is_term() {
                anyhow::bail!("Refusing to write a {format} report to the terminal, use --output");
            }
            let bytes = render_report(&case, format)?;
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(&bytes)
                .context("Failed to write report to stdout")?;
            stdout.flush()?;
        }
    }
    Ok(())
}
