use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use hemascope_core::case::CaseData;
use hemascope_core::config::ViewerConfig;
use hemascope_core::image_handle::image_dimensions;
use tracing::warn;

use crate::summary::print_case_summary;

#[derive(Args)]
pub struct InfoArgs {
    /// Case file (JSON)
    pub case: PathBuf,
}

pub fn run(args: &InfoArgs, config: &ViewerConfig) -> Result<()> {
    let case = CaseData::load(&args.case, &config.detection_filter)
        .with_context(|| format!("Failed to load case {}", args.case.display()))?;

    let size = match case.image_path() {
        Ok(path) => match image_dimensions(path) {
            Ok(size) => Some(size),
            Err(e) => {
                warn!(error = %e, "Cannot read image header");
                None
            }
        },
        Err(_) => None,
    };

    print_case_summary(&case, size);
    Ok(())
}
