pub mod annotation;
pub mod case;
pub mod config;
pub mod consts;
pub mod error;
pub mod focus;
pub mod geometry;
pub mod image_handle;
pub mod pointer;
pub mod raster;
pub mod render;
pub mod report;
pub mod surface;
pub mod zoom;
