use thiserror::Error;

#[derive(Error, Debug)]
pub enum HemascopeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image format error: {0}")]
    Image(#[from] image::ImageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    ConfigWrite(#[from] toml::ser::Error),

    #[error("Failed to load image {source_name}: {reason}")]
    ImageLoad { source_name: String, reason: String },

    #[error("Malformed annotation #{index}: {reason}")]
    MalformedAnnotation { index: usize, reason: String },

    #[error("Display surface unavailable: {width}x{height}")]
    SurfaceUnavailable { width: f32, height: f32 },

    #[error("Invalid case data: {0}")]
    InvalidCase(String),

    #[error("Invalid zoom factor: {0}")]
    InvalidZoom(f32),

    #[error("Failed to build PDF: {0}")]
    Pdf(String),

    #[error("Invalid style: {field} = {value}")]
    InvalidStyle { field: &'static str, value: f32 },
}

pub type Result<T> = std::result::Result<T, HemascopeError>;
