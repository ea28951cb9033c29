use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_ZOOM, DEFAULT_ZOOM_STEP, HUB_MIN_ZOOM, MAX_ZOOM, SLIDER_MIN_ZOOM};
use crate::error::{HemascopeError, Result};

/// Allowed main-view zoom interval.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ZoomRange {
    pub min: f32,
    pub max: f32,
}

impl ZoomRange {
    /// `[1.0, 5.0]`: never zooms out past the fitted view.
    pub const HUB: Self = Self {
        min: HUB_MIN_ZOOM,
        max: MAX_ZOOM,
    };

    /// `[0.5, 5.0]`: the viewer slider range.
    pub const SLIDER: Self = Self {
        min: SLIDER_MIN_ZOOM,
        max: MAX_ZOOM,
    };

    pub fn clamp(&self, zoom: f32) -> f32 {
        zoom.clamp(self.min, self.max)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.min.is_finite() && self.max.is_finite()) || self.min <= 0.0 {
            return Err(HemascopeError::InvalidZoom(self.min));
        }
        if self.max < self.min {
            return Err(HemascopeError::InvalidZoom(self.max));
        }
        Ok(())
    }
}

impl Default for ZoomRange {
    fn default() -> Self {
        Self::SLIDER
    }
}

impl fmt::Display for ZoomRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}x - {:.1}x", self.min, self.max)
    }
}

/// Zoom settings as stored in the viewer config.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomConfig {
    pub initial: f32,
    pub step: f32,
    pub range: ZoomRange,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            initial: DEFAULT_ZOOM,
            step: DEFAULT_ZOOM_STEP,
            range: ZoomRange::default(),
        }
    }
}

/// Clamped main-view zoom with step and reset actions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomControl {
    zoom: f32,
    config: ZoomConfig,
}

impl ZoomControl {
    pub fn new(config: ZoomConfig) -> Result<Self> {
        config.range.validate()?;
        if !config.step.is_finite() || config.step <= 0.0 {
            return Err(HemascopeError::InvalidZoom(config.step));
        }
        Ok(Self {
            zoom: config.range.clamp(config.initial),
            config,
        })
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn range(&self) -> ZoomRange {
        self.config.range
    }

    pub fn step(&self) -> f32 {
        self.config.step
    }

    /// Set the zoom, clamped into range. Non-finite values are ignored.
    pub fn set(&mut self, zoom: f32) -> f32 {
        if zoom.is_finite() {
            self.zoom = self.config.range.clamp(zoom);
        }
        self.zoom
    }

    pub fn zoom_in(&mut self) -> f32 {
        self.set(self.zoom + self.config.step)
    }

    pub fn zoom_out(&mut self) -> f32 {
        self.set(self.zoom - self.config.step)
    }

    pub fn reset(&mut self) -> f32 {
        self.set(self.config.initial)
    }
}

impl Default for ZoomControl {
    fn default() -> Self {
        Self {
            zoom: DEFAULT_ZOOM,
            config: ZoomConfig::default(),
        }
    }
}
