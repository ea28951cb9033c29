use std::path::PathBuf;

use hemascope_core::case::{CaseData, DetectionFilter};
use hemascope_core::config::ViewerConfig;
use hemascope_core::error::Result;
use hemascope_core::image_handle::RequestToken;
use hemascope_core::report::ReportFormat;
use image::RgbaImage;

/// Commands sent from UI thread to worker thread.
pub enum WorkerCommand {
    /// Parse a case file.
    LoadCase {
        path: PathBuf,
        filter: DetectionFilter,
    },

    /// Decode the slide image for the given request.
    DecodeImage { token: RequestToken, path: PathBuf },

    /// Write the detection report for a case.
    ExportReport {
        case: Box<CaseData>,
        path: PathBuf,
        format: ReportFormat,
    },
}

/// Results sent from worker thread back to UI thread.
pub enum WorkerResult {
    CaseLoaded {
        path: PathBuf,
        case: Box<CaseData>,
    },
    /// Outcome of a decode; the token decides whether it is still wanted.
    ImageDecoded {
        token: RequestToken,
        result: Result<RgbaImage>,
    },
    ReportSaved {
        path: PathBuf,
    },
    ConfigImported {
        path: PathBuf,
        config: Box<ViewerConfig>,
    },
    Error {
        message: String,
    },
    Log {
        message: String,
    },
}
