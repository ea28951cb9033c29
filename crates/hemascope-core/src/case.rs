//! Case files: patient metadata, slide image reference, detection output and
//! cell-count findings.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::annotation::{Annotation, AnnotationSet};
use crate::consts::{DEFAULT_DETECTION_LIMIT, DEFAULT_DETECTION_REGION};
use crate::error::{HemascopeError, Result};

const DEFAULT_PATIENT_ID: &str = "Case-2025-001";
const DEFAULT_SAMPLE_TYPE: &str = "Blood";
const DEFAULT_WSI_ID: &str = "WSI-2025-001";

/// Detection type shown with the finding details.
pub const DETECTION_TYPE: &str = "Abnormal Cell Cluster";

/// Label the detector reports with high confidence.
const CONFIDENT_LABEL: &str = "Circular_RBC";
const CONFIDENT_SCORE: f32 = 98.5;

/// One detector result as stored on disk: `[x0, y0, x1, y1, label]`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawDetection(pub f32, pub f32, pub f32, pub f32, pub String);

impl RawDetection {
    pub fn to_annotation(&self) -> Annotation {
        Annotation::from_corners(self.0, self.1, self.2, self.3, self.4.clone())
    }
}

/// Optional reduction of the detection list to a top-left region.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionFilter {
    pub enabled: bool,
    /// Keep detections whose top-left corner lies below this bound on both axes.
    pub region: f32,
    /// Keep at most this many, in file order.
    pub limit: usize,
}

impl Default for DetectionFilter {
    fn default() -> Self {
        Self {
            enabled: false,
            region: DEFAULT_DETECTION_REGION,
            limit: DEFAULT_DETECTION_LIMIT,
        }
    }
}

impl DetectionFilter {
    pub fn apply(&self, detections: Vec<RawDetection>) -> Vec<RawDetection> {
        if !self.enabled {
            return detections;
        }
        detections
            .into_iter()
            .filter(|d| d.0 < self.region && d.1 < self.region)
            .take(self.limit)
            .collect()
    }
}

/// One row of a findings table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CellCount {
    pub name: String,
    pub count: u32,
    pub percentage: String,
}

impl CellCount {
    pub fn new(name: impl Into<String>, count: u32, percentage: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            count,
            percentage: percentage.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlateletCount {
    pub count: u32,
    pub percentage: String,
}

/// Cell-count tables shown beside the slide.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Findings {
    pub rbc: Vec<CellCount>,
    pub wbc: Vec<CellCount>,
    pub platelets: PlateletCount,
}

impl Default for Findings {
    fn default() -> Self {
        Self {
            rbc: vec![
                CellCount::new("Angled Cells", 222, "67%"),
                CellCount::new("Borderline Ovalocytes", 50, "20%"),
                CellCount::new("Burr Cells", 87, "34%"),
                CellCount::new("Fragmented Cells", 2, "0.12%"),
                CellCount::new("Ovalocytes", 0, "0%"),
                CellCount::new("Rounded RBC", 0, "0%"),
                CellCount::new("Teardrops", 0, "0%"),
            ],
            wbc: vec![
                CellCount::new("Basophil", 222, "67%"),
                CellCount::new("Eosinophil", 50, "20%"),
                CellCount::new("Lymphocyte", 87, "34%"),
                CellCount::new("Monocyte", 2, "0.12%"),
            ],
            platelets: PlateletCount {
                count: 222,
                percentage: "22%".into(),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct CaseFile {
    patient_id: Option<String>,
    sample_type: Option<String>,
    wsi_id: Option<String>,
    image: Option<PathBuf>,
    filename: Option<String>,
    inference_results: Option<InferenceResults>,
    findings: Option<Findings>,
}

#[derive(Debug, Deserialize)]
struct InferenceResults {
    output: Option<InferenceOutput>,
}

#[derive(Debug, Deserialize)]
struct InferenceOutput {
    detection_results: Option<Vec<RawDetection>>,
}

/// A loaded case. Annotations are converted once and shared by reference
/// with the renderers.
#[derive(Clone, Debug)]
pub struct CaseData {
    pub patient_id: String,
    pub sample_type: String,
    pub wsi_id: String,
    /// Slide image path; relative paths are resolved against the case file's
    /// directory by [`CaseData::load`].
    pub image: Option<PathBuf>,
    pub filename: Option<String>,
    pub detections: Vec<RawDetection>,
    pub findings: Findings,
    annotations: AnnotationSet,
}

impl CaseData {
    pub fn from_json_str(text: &str, filter: &DetectionFilter) -> Result<Self> {
        let file: CaseFile = serde_json::from_str(text)?;
        let raw = file
            .inference_results
            .and_then(|r| r.output)
            .and_then(|o| o.detection_results)
            .ok_or_else(|| {
                HemascopeError::InvalidCase(
                    "missing inference_results.output.detection_results".into(),
                )
            })?;
        let total = raw.len();
        let detections = filter.apply(raw);
        if detections.len() != total {
            debug!(total, kept = detections.len(), "Detection filter applied");
        }

        let annotations =
            AnnotationSet::new(detections.iter().map(RawDetection::to_annotation).collect());
        let filename = file.filename.or_else(|| {
            file.image
                .as_deref()
                .and_then(Path::file_name)
                .map(|n| n.to_string_lossy().into_owned())
        });
        Ok(Self {
            patient_id: file.patient_id.unwrap_or_else(|| DEFAULT_PATIENT_ID.into()),
            sample_type: file.sample_type.unwrap_or_else(|| DEFAULT_SAMPLE_TYPE.into()),
            wsi_id: file.wsi_id.unwrap_or_else(|| DEFAULT_WSI_ID.into()),
            image: file.image,
            filename,
            detections,
            findings: file.findings.unwrap_or_default(),
            annotations,
        })
    }

    pub fn load(path: &Path, filter: &DetectionFilter) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let mut case = Self::from_json_str(&text, filter)?;
        if let (Some(image), Some(dir)) = (case.image.as_ref(), path.parent()) {
            if image.is_relative() {
                case.image = Some(dir.join(image));
            }
        }
        info!(
            path = %path.display(),
            patient = %case.patient_id,
            detections = case.detections.len(),
            "Case loaded"
        );
        Ok(case)
    }

    pub fn annotations(&self) -> &AnnotationSet {
        &self.annotations
    }

    pub fn detection_count(&self) -> usize {
        self.detections.len()
    }

    /// Mean per-detection confidence in percent: `Circular_RBC` detections
    /// score 98.5, everything else 0. `None` without detections.
    pub fn confidence_score(&self) -> Option<f32> {
        if self.detections.is_empty() {
            return None;
        }
        let total: f32 = self
            .detections
            .iter()
            .map(|d| if d.4 == CONFIDENT_LABEL { CONFIDENT_SCORE } else { 0.0 })
            .sum();
        Some(total / self.detections.len() as f32)
    }

    /// Image path, or an `InvalidCase` error when the case names none.
    pub fn image_path(&self) -> Result<&Path> {
        self.image
            .as_deref()
            .ok_or_else(|| HemascopeError::InvalidCase("case has no image".into()))
    }
}
