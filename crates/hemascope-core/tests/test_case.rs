#[allow(dead_code)]
mod common;

use tempfile::TempDir;

use hemascope_core::case::{CaseData, DetectionFilter, Findings, RawDetection};
use hemascope_core::error::HemascopeError;
use hemascope_core::geometry::ImageRect;

#[test]
fn test_case_parses_detections_as_rects() {
    let json = common::sample_case_json("slide.png");
    let case = CaseData::from_json_str(&json, &DetectionFilter::default()).unwrap();
    assert_eq!(case.patient_id, "P-0042");
    assert_eq!(case.sample_type, "Blood");
    assert_eq!(case.filename.as_deref(), Some("slide_0042.png"));
    assert_eq!(case.detection_count(), 4);

    let annotations = case.annotations();
    assert_eq!(annotations.len(), 4);
    let first = &annotations.as_slice()[0];
    assert_eq!(first.rect, ImageRect::new(10.0, 20.0, 30.0, 40.0));
    assert_eq!(first.label, "Circular_RBC");
    assert_eq!(
        case.detections[1],
        RawDetection(100.0, 100.0, 150.0, 130.0, "Elongated_RBC".into())
    );
}

#[test]
fn test_case_missing_detection_results() {
    let json = r#"{ "patient_id": "X", "inference_results": { "output": {} } }"#;
    let err = CaseData::from_json_str(json, &DetectionFilter::default()).unwrap_err();
    assert!(matches!(err, HemascopeError::InvalidCase(_)));

    let err = CaseData::from_json_str("{}", &DetectionFilter::default()).unwrap_err();
    assert!(matches!(err, HemascopeError::InvalidCase(_)));
}

#[test]
fn test_case_malformed_json() {
    let err = CaseData::from_json_str("{ not json", &DetectionFilter::default()).unwrap_err();
    assert!(matches!(err, HemascopeError::Json(_)));
}

#[test]
fn test_case_defaults_when_metadata_missing() {
    let json = r#"{
        "image": "images/a.png",
        "inference_results": { "output": { "detection_results": [] } }
    }"#;
    let case = CaseData::from_json_str(json, &DetectionFilter::default()).unwrap();
    assert_eq!(case.patient_id, "Case-2025-001");
    assert_eq!(case.sample_type, "Blood");
    assert_eq!(case.filename.as_deref(), Some("a.png"));
    assert!(case.annotations().is_empty());
    assert_eq!(case.findings, Findings::default());
}

#[test]
fn test_confidence_score_without_detections() {
    let json = r#"{ "inference_results": { "output": { "detection_results": [] } } }"#;
    let case = CaseData::from_json_str(json, &DetectionFilter::default()).unwrap();
    assert_eq!(case.confidence_score(), None);
    assert_eq!(case.wsi_id, "WSI-2025-001");
}

#[test]
fn test_confidence_score_all_circular() {
    let json = r#"{
        "wsi_id": "WSI-7",
        "inference_results": { "output": { "detection_results": [
            [0, 0, 5, 5, "Circular_RBC"],
            [9, 9, 15, 15, "Circular_RBC"]
        ] } }
    }"#;
    let case = CaseData::from_json_str(json, &DetectionFilter::default()).unwrap();
    assert_eq!(case.confidence_score(), Some(98.5));
    assert_eq!(case.wsi_id, "WSI-7");
}

#[test]
fn test_confidence_score_mixed_labels() {
    // Two of the four sample detections are circular.
    let json = common::sample_case_json("slide.png");
    let case = CaseData::from_json_str(&json, &DetectionFilter::default()).unwrap();
    assert_eq!(case.confidence_score(), Some(49.25));
}

#[test]
fn test_case_keeps_inverted_corners_for_renderer_to_skip() {
    let json = r#"{
        "inference_results": { "output": { "detection_results": [[50, 50, 10, 60, "bad"]] } }
    }"#;
    let case = CaseData::from_json_str(json, &DetectionFilter::default()).unwrap();
    assert!(case.annotations().as_slice()[0].validate(0).is_err());
}

#[test]
fn test_detection_filter() {
    let filter = DetectionFilter {
        enabled: true,
        ..DetectionFilter::default()
    };
    let case = CaseData::from_json_str(&common::sample_case_json("s.png"), &filter).unwrap();
    // (400, 50) is outside the region.
    let labels: Vec<&str> = case.annotations().iter().map(|a| a.label.as_str()).collect();
    assert_eq!(labels, vec!["Circular_RBC", "Elongated_RBC", "WBC"]);

    let limited = DetectionFilter {
        enabled: true,
        region: 1000.0,
        limit: 2,
    };
    let case = CaseData::from_json_str(&common::sample_case_json("s.png"), &limited).unwrap();
    assert_eq!(case.detection_count(), 2);
}

#[test]
fn test_detection_filter_disabled_by_default() {
    let detections = vec![RawDetection(900.0, 900.0, 950.0, 950.0, "x".into()); 30];
    assert_eq!(DetectionFilter::default().apply(detections).len(), 30);
}

#[test]
fn test_case_findings_from_file() {
    let json = r#"{
        "inference_results": { "output": { "detection_results": [] } },
        "findings": {
            "rbc": [{ "name": "Teardrops", "count": 3, "percentage": "1%" }],
            "platelets": { "count": 10, "percentage": "5%" }
        }
    }"#;
    let case = CaseData::from_json_str(json, &DetectionFilter::default()).unwrap();
    assert_eq!(case.findings.rbc.len(), 1);
    assert_eq!(case.findings.rbc[0].count, 3);
    assert_eq!(case.findings.platelets.count, 10);
    // Missing table falls back to the defaults.
    assert_eq!(case.findings.wbc, Findings::default().wbc);
}

#[test]
fn test_case_load_resolves_image_relative_to_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("case.json");
    std::fs::write(&path, common::sample_case_json("slide.png")).unwrap();

    let case = CaseData::load(&path, &DetectionFilter::default()).unwrap();
    assert_eq!(case.image_path().unwrap(), dir.path().join("slide.png"));
}

#[test]
fn test_case_without_image() {
    let json = r#"{ "inference_results": { "output": { "detection_results": [] } } }"#;
    let case = CaseData::from_json_str(json, &DetectionFilter::default()).unwrap();
    assert!(matches!(case.image_path(), Err(HemascopeError::InvalidCase(_))));
}

#[test]
fn test_case_load_missing_file() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.json");
    let err = CaseData::load(&missing, &DetectionFilter::default()).unwrap_err();
    assert!(matches!(err, HemascopeError::Io(_)));
}
