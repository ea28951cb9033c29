use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::case::DetectionFilter;
use crate::consts::{DEFAULT_INSET_SIZE, DEFAULT_INSET_ZOOM};
use crate::error::{HemascopeError, Result};
use crate::geometry::SurfaceSize;
use crate::pointer::FocusMode;
use crate::render::{ClampMode, InsetParams, RenderStyle};
use crate::zoom::ZoomConfig;

/// Viewer settings, read from TOML. Every section may be omitted.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub focus_mode: FocusMode,
    /// Give up on an image that has not finished decoding after this many
    /// seconds. No timeout when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_timeout_secs: Option<u64>,
    pub zoom: ZoomConfig,
    pub inset: InsetConfig,
    pub style: RenderStyle,
    pub detection_filter: DetectionFilter,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsetConfig {
    /// Inset size in display pixels.
    pub width: f32,
    pub height: f32,
    /// Magnification factor; must be at least 1.
    pub zoom: f32,
    pub clamp: ClampMode,
}

impl Default for InsetConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_INSET_SIZE,
            height: DEFAULT_INSET_SIZE,
            zoom: DEFAULT_INSET_ZOOM,
            clamp: ClampMode::Clamped,
        }
    }
}

impl InsetConfig {
    pub fn params(&self) -> InsetParams {
        InsetParams {
            zoom: self.zoom,
            clamp: self.clamp,
        }
    }

    pub fn size(&self) -> SurfaceSize {
        SurfaceSize::new(self.width, self.height)
    }
}

impl ViewerConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if !self.inset.zoom.is_finite() || self.inset.zoom < 1.0 {
            return Err(HemascopeError::InvalidZoom(self.inset.zoom));
        }
        self.zoom.range.validate()?;
        if !self.zoom.step.is_finite() || self.zoom.step <= 0.0 {
            return Err(HemascopeError::InvalidZoom(self.zoom.step));
        }
        for (field, value) in [
            ("stroke_width", self.style.stroke_width),
            ("pointer_radius", self.style.pointer_radius),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(HemascopeError::InvalidStyle { field, value });
            }
        }
        Ok(())
    }

    pub fn load_timeout(&self) -> Option<Duration> {
        self.load_timeout_secs.map(Duration::from_secs)
    }
}
