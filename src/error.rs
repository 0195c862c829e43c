use thiserror::Error;

use crate::raster::RasterId;

/// Errors produced by the editor core and the export paths
#[derive(Debug, Error)]
pub enum EditorError {
    #[error("Failed to decode or encode image: {0}")]
    Image(#[from] image::ImageError),

    #[error("Failed to (de)serialize surface snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Clipboard error: {0}")]
    Clipboard(String),

    #[error("Snapshot refers to unknown raster {0}")]
    MissingRaster(RasterId),

    #[error("Region {width}x{height} at ({left}, {top}) is empty after clamping to the surface")]
    EmptyRegion {
        left: f32,
        top: f32,
        width: f32,
        height: f32,
    },

    #[error("Upload failed: {0}")]
    Upload(#[from] reqwest::Error),

    #[error("Share failed: {0}")]
    Share(String),

    #[error("Failed to rasterize surface: {0}")]
    Rasterize(String),
}

/// Result type for editor operations
pub type EditorResult<T> = Result<T, EditorError>;
