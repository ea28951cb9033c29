use std::fmt::{self, Write as _};
use std::path::Path;
use std::str::FromStr;

use printpdf::{BuiltinFont, Mm, PdfDocument};
use serde::Serialize;

use crate::case::{CaseData, Findings};
use crate::error::{HemascopeError, Result};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
    Csv,
    /// Text report laid out on A4 pages.
    Pdf,
}

impl ReportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Pdf => "pdf",
        }
    }

    pub fn is_binary(self) -> bool {
        matches!(self, Self::Pdf)
    }

    /// Pick a format from a file extension, defaulting to text.
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(|e| e.parse().ok())
            .unwrap_or_default()
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Text => "text",
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Pdf => "pdf",
        })
    }
}

impl FromStr for ReportFormat {
    type Err = HemascopeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            "pdf" => Ok(Self::Pdf),
            other => Err(HemascopeError::InvalidCase(format!(
                "unknown report format '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Serialize)]
struct ReportDetection<'a> {
    label: &'a str,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
}

#[derive(Debug, Serialize)]
struct ReportDocument<'a> {
    patient_id: &'a str,
    sample_type: &'a str,
    filename: Option<&'a str>,
    total_detections: usize,
    detections: Vec<ReportDetection<'a>>,
    findings: &'a Findings,
}

fn detections(case: &CaseData) -> Vec<ReportDetection<'_>> {
    case.annotations()
        .iter()
        .map(|a| ReportDetection {
            label: &a.label,
            x: a.rect.x,
            y: a.rect.y,
            width: a.rect.width,
            height: a.rect.height,
        })
        .collect()
}

/// Render the case summary and detection list.
pub fn render_report(case: &CaseData, format: ReportFormat) -> Result<Vec<u8>> {
    match format {
        ReportFormat::Text => Ok(render_text(case).into_bytes()),
        ReportFormat::Json => {
            let doc = ReportDocument {
                patient_id: &case.patient_id,
                sample_type: &case.sample_type,
                filename: case.filename.as_deref(),
                total_detections: case.detection_count(),
                detections: detections(case),
                findings: &case.findings,
            };
            Ok(serde_json::to_vec_pretty(&doc)?)
        }
        ReportFormat::Csv => Ok(render_csv(case).into_bytes()),
        ReportFormat::Pdf => render_pdf(case),
    }
}

pub fn write_report(case: &CaseData, format: ReportFormat, path: &Path) -> Result<()> {
    std::fs::write(path, render_report(case, format)?)?;
    Ok(())
}

fn render_text(case: &CaseData) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = writeln!(out, "Whole Slide Image Report");
    let _ = writeln!(out, "Patient ID: {}", case.patient_id);
    let _ = writeln!(out, "Sample Type: {}", case.sample_type);
    let _ = writeln!(out, "Filename: {}", case.filename.as_deref().unwrap_or("-"));
    let _ = writeln!(out, "Total Detections: {}", case.detection_count());
    let _ = writeln!(out, "Findings:");
    for d in detections(case) {
        let _ = writeln!(
            out,
            "{} - x:{}, y:{}, w:{}, h:{}",
            d.label, d.x, d.y, d.width, d.height
        );
    }
    out
}

const PAGE_WIDTH: Mm = Mm(210.0);
const PAGE_HEIGHT: Mm = Mm(297.0);
const PAGE_MARGIN: f32 = 20.0;
const FONT_SIZE: f32 = 11.0;
const LINE_HEIGHT: f32 = 6.0;

fn pdf_err(e: impl fmt::Display) -> HemascopeError {
    HemascopeError::Pdf(e.to_string())
}

/// The text report, one line per row, continued onto new pages as needed.
fn render_pdf(case: &CaseData) -> Result<Vec<u8>> {
    let title = format!("Whole Slide Image Report {}", case.patient_id);
    let (doc, page, layer) = PdfDocument::new(&title, PAGE_WIDTH, PAGE_HEIGHT, "Report");
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(pdf_err)?;

    let top = PAGE_HEIGHT.0 - PAGE_MARGIN;
    let mut current = doc.get_page(page).get_layer(layer);
    let mut y = top;
    for line in render_text(case).lines() {
        if y < PAGE_MARGIN {
            let (page, layer) = doc.add_page(PAGE_WIDTH, PAGE_HEIGHT, "Report");
            current = doc.get_page(page).get_layer(layer);
            y = top;
        }
        current.use_text(line, FONT_SIZE, Mm(PAGE_MARGIN), Mm(y), &font);
        y -= LINE_HEIGHT;
    }
    doc.save_to_bytes().map_err(pdf_err)
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn render_csv(case: &CaseData) -> String {
    let mut out = String::from("label,x,y,width,height\n");
    for d in detections(case) {
        let _ = writeln!(
            out,
            "{},{},{},{},{}",
            csv_field(d.label),
            d.x,
            d.y,
            d.width,
            d.height
        );
    }
    out
}
