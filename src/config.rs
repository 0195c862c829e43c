use std::path::PathBuf;

use egui::Color32;
use serde::{Deserialize, Serialize};

use crate::command::DEFAULT_HISTORY_LIMIT;
use crate::element::Pen;
use crate::transform::DEFAULT_BLUR_RADIUS;

pub const DEFAULT_TEXT_SIZE: f32 = 24.0;
pub const HIGHLIGHT_WIDTH: f32 = 15.0;

/// Translucent yellow used by the highlight tool
pub fn highlight_color() -> Color32 {
    Color32::from_rgba_unmultiplied(255, 255, 0, 128)
}

/// User-adjustable editor settings.
///
/// Persisted between runs through eframe storage; the edit history is not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
pub struct EditorConfig {
    pub brush_color: Color32,
    pub brush_width: f32,
    pub text_size: f32,
    pub history_limit: usize,
    pub blur_radius: u32,
    pub export_dir: Option<PathBuf>,
    /// Receives shared screenshots as a multipart `image` field
    pub upload_endpoint: Option<String>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            brush_color: Color32::from_rgb(255, 0, 0),
            brush_width: 4.0,
            text_size: DEFAULT_TEXT_SIZE,
            history_limit: DEFAULT_HISTORY_LIMIT,
            blur_radius: DEFAULT_BLUR_RADIUS,
            export_dir: None,
            upload_endpoint: None,
        }
    }
}

impl EditorConfig {
    pub fn brush(&self) -> Pen {
        Pen::new(self.brush_color, self.brush_width)
    }

    pub fn highlighter(&self) -> Pen {
        Pen::new(highlight_color(), HIGHLIGHT_WIDTH)
    }
}
