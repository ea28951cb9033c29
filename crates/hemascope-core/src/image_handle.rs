use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use image::RgbaImage;
use tracing::{debug, info, warn};

use crate::error::{HemascopeError, Result};
use crate::geometry::ImageSize;

/// Identifies one image load request. Tokens increase monotonically per loader.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// A decoded, immutable raster image.
#[derive(Clone, Debug)]
pub struct SlideImage {
    id: u64,
    pixels: Arc<RgbaImage>,
}

impl SlideImage {
    pub fn new(id: u64, pixels: RgbaImage) -> Self {
        Self {
            id,
            pixels: Arc::new(pixels),
        }
    }

    /// Identity of this image; equal to the token value of the request that
    /// produced it.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn size(&self) -> ImageSize {
        ImageSize::new(self.pixels.width(), self.pixels.height())
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }
}

/// Lifecycle of the displayed image.
#[derive(Clone, Debug, Default)]
pub enum ImageHandle {
    /// Nothing requested yet.
    #[default]
    Empty,
    Loading {
        token: RequestToken,
        source: String,
    },
    Ready(SlideImage),
    Failed {
        source: String,
        message: String,
    },
}

impl ImageHandle {
    pub fn ready(&self) -> Option<&SlideImage> {
        match self {
            Self::Ready(image) => Some(image),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Tracks image requests and accepts only the completion of the latest one.
#[derive(Debug, Default)]
pub struct ImageLoader {
    issued: u64,
    handle: ImageHandle,
    requested_at: Option<Instant>,
    timeout: Option<Duration>,
}

impl ImageLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loader that fails a request still pending after `timeout`.
    pub fn with_timeout(timeout: Option<Duration>) -> Self {
        Self {
            timeout,
            ..Self::default()
        }
    }

    /// Change the timeout. Applies to the pending request as well.
    pub fn set_timeout(&mut self, timeout: Option<Duration>) {
        self.timeout = timeout;
    }

    pub fn handle(&self) -> &ImageHandle {
        &self.handle
    }

    /// Token of the most recent request, if any was issued.
    pub fn latest_token(&self) -> Option<RequestToken> {
        (self.issued > 0).then_some(RequestToken(self.issued))
    }

    /// Start a new request. Any pending request becomes stale.
    pub fn request(&mut self, source: impl Into<String>) -> RequestToken {
        self.request_at(source, Instant::now())
    }

    pub fn request_at(&mut self, source: impl Into<String>, now: Instant) -> RequestToken {
        self.issued += 1;
        let token = RequestToken(self.issued);
        let source = source.into();
        debug!(token = token.0, source = %source, "Image requested");
        self.handle = ImageHandle::Loading { token, source };
        self.requested_at = Some(now);
        token
    }

    /// Deliver the outcome of a request. Returns `false` and leaves the handle
    /// untouched when `token` is not the pending request.
    pub fn complete(&mut self, token: RequestToken, result: Result<RgbaImage>) -> bool {
        let source = match &self.handle {
            ImageHandle::Loading {
                token: pending,
                source,
            } if *pending == token => source.clone(),
            _ => {
                debug!(token = token.0, "Discarding stale image load");
                return false;
            }
        };

        self.requested_at = None;
        self.handle = match result {
            Ok(pixels) => {
                info!(
                    width = pixels.width(),
                    height = pixels.height(),
                    source = %source,
                    "Image ready"
                );
                ImageHandle::Ready(SlideImage::new(token.0, pixels))
            }
            Err(e) => {
                warn!(source = %source, error = %e, "Image load failed");
                ImageHandle::Failed {
                    source,
                    message: e.to_string(),
                }
            }
        };
        true
    }

    /// Fail the pending request if it has outlived the configured timeout.
    /// Returns `true` if the handle changed.
    pub fn expire(&mut self, now: Instant) -> bool {
        let (Some(timeout), Some(started)) = (self.timeout, self.requested_at) else {
            return false;
        };
        if now.saturating_duration_since(started) < timeout {
            return false;
        }
        let Some(token) = self.latest_token() else {
            return false;
        };
        let source = match &self.handle {
            ImageHandle::Loading { source, .. } => source.clone(),
            _ => return false,
        };
        self.complete(
            token,
            Err(HemascopeError::ImageLoad {
                source_name: source,
                reason: format!("timed out after {:.1}s", timeout.as_secs_f32()),
            }),
        )
    }
}

/// Decode an image file into RGBA8.
pub fn decode_image(path: &Path) -> Result<RgbaImage> {
    let img = image::open(path).map_err(|e| HemascopeError::ImageLoad {
        source_name: path.display().to_string(),
        reason: e.to_string(),
    })?;
    Ok(img.to_rgba8())
}

/// Read only the image header for its dimensions.
pub fn image_dimensions(path: &Path) -> Result<ImageSize> {
    let (width, height) = image::image_dimensions(path).map_err(|e| HemascopeError::ImageLoad {
        source_name: path.display().to_string(),
        reason: e.to_string(),
    })?;
    Ok(ImageSize::new(width, height))
}

/// Decode an in-memory encoded image into RGBA8.
pub fn decode_bytes(bytes: &[u8]) -> Result<RgbaImage> {
    Ok(image::load_from_memory(bytes)?.to_rgba8())
}
