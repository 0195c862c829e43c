mod history;

use egui::Color32;

use crate::tools::ToolMode;

pub use history::{DEFAULT_HISTORY_LIMIT, History};

/// Non-pointer operations the editor session can execute
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Change the active tool
    SetTool(ToolMode),
    /// Add a placeholder text label and start editing it
    InsertText,
    /// Start a crop selection, or apply the pending one
    ToggleCrop,
    /// Apply the pending crop selection
    ApplyCrop,
    /// Drop the pending crop selection
    CancelCrop,
    Undo,
    Redo,
    /// Remove the selected annotation
    DeleteSelection,
    /// Remove every annotation, keeping the current background
    Clear,
    SetBrushColor(Color32),
    SetBrushWidth(f32),
}

impl Command {
    /// Short label for logs and tooltips
    pub fn label(&self) -> &'static str {
        match self {
            Command::SetTool(_) => "Set tool",
            Command::InsertText => "Insert text",
            Command::ToggleCrop => "Toggle crop",
            Command::ApplyCrop => "Apply crop",
            Command::CancelCrop => "Cancel crop",
            Command::Undo => "Undo",
            Command::Redo => "Redo",
            Command::DeleteSelection => "Delete selection",
            Command::Clear => "Clear",
            Command::SetBrushColor(_) => "Set brush color",
            Command::SetBrushWidth(_) => "Set brush width",
        }
    }
}
