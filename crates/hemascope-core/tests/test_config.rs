use std::time::Duration;

use tempfile::TempDir;

use hemascope_core::config::ViewerConfig;
use hemascope_core::error::HemascopeError;
use hemascope_core::pointer::FocusMode;
use hemascope_core::render::ClampMode;
use hemascope_core::surface::Color;
use hemascope_core::zoom::ZoomRange;

#[test]
fn test_config_defaults() {
    let config = ViewerConfig::default();
    assert_eq!(config.inset.zoom, 4.0);
    assert_eq!(config.inset.width, 200.0);
    assert_eq!(config.inset.clamp, ClampMode::Clamped);
    assert_eq!(config.focus_mode, FocusMode::Surface);
    assert_eq!(config.zoom.range, ZoomRange::SLIDER);
    assert!(config.load_timeout().is_none());
    assert!(!config.detection_filter.enabled);
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_empty_toml_is_default() {
    assert_eq!(ViewerConfig::from_toml_str("").unwrap(), ViewerConfig::default());
}

#[test]
fn test_config_partial_toml() {
    let text = r#"
focus_mode = "Image"
load_timeout_secs = 30

[inset]
zoom = 6.0
clamp = "Unclamped"

[style]
stroke_width = 3.5
stroke_color = { r = 255, g = 0, b = 0, a = 255 }

[zoom.range]
min = 1.0
max = 8.0

[detection_filter]
enabled = true
"#;
    let config = ViewerConfig::from_toml_str(text).unwrap();
    assert_eq!(config.focus_mode, FocusMode::Image);
    assert_eq!(config.load_timeout(), Some(Duration::from_secs(30)));
    assert_eq!(config.inset.zoom, 6.0);
    assert_eq!(config.inset.width, 200.0);
    assert_eq!(config.inset.clamp, ClampMode::Unclamped);
    assert_eq!(config.style.stroke_width, 3.5);
    assert_eq!(config.style.stroke_color, Color::rgb(255, 0, 0));
    assert!(config.style.show_annotations);
    assert_eq!(config.zoom.range.max, 8.0);
    assert_eq!(config.zoom.step, 0.1);
    assert!(config.detection_filter.enabled);
    assert_eq!(config.detection_filter.limit, 20);
}

#[test]
fn test_config_rejects_inset_zoom_below_one() {
    let err = ViewerConfig::from_toml_str("[inset]\nzoom = 0.5\n").unwrap_err();
    assert!(matches!(err, HemascopeError::InvalidZoom(z) if z == 0.5));
}

#[test]
fn test_config_rejects_negative_stroke_width() {
    let err = ViewerConfig::from_toml_str("[style]\nstroke_width = -2.0\n").unwrap_err();
    assert!(matches!(
        err,
        HemascopeError::InvalidStyle { field: "stroke_width", value } if value == -2.0
    ));
}

#[test]
fn test_config_rejects_non_finite_pointer_radius() {
    let err = ViewerConfig::from_toml_str("[style]\npointer_radius = inf\n").unwrap_err();
    assert!(matches!(
        err,
        HemascopeError::InvalidStyle { field: "pointer_radius", .. }
    ));

    let mut config = ViewerConfig::default();
    config.style.pointer_radius = f32::NAN;
    assert!(config.validate().is_err());
    config.style.pointer_radius = 0.0;
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_rejects_bad_toml() {
    let err = ViewerConfig::from_toml_str("focus_mode = 12").unwrap_err();
    assert!(matches!(err, HemascopeError::Config(_)));
}

#[test]
fn test_config_save_and_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("viewer.toml");
    let mut config = ViewerConfig::default();
    config.inset.zoom = 3.0;
    config.load_timeout_secs = Some(12);
    config.save(&path).unwrap();

    let loaded = ViewerConfig::load(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_config_inset_params() {
    let config = ViewerConfig::default();
    let params = config.inset.params();
    assert_eq!(params.zoom, 4.0);
    assert_eq!(config.inset.size().width, 200.0);
}
