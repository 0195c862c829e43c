use serde::{Deserialize, Serialize};

mod gesture;
pub use gesture::{Gesture, GestureKind};

/// Interaction mode deciding how pointer events are interpreted.
/// Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ToolMode {
    #[default]
    Select,
    Draw,
    Highlight,
    Arrow,
    Rectangle,
    Ellipse,
    Line,
    Text,
    Blur,
    Crop,
}

impl ToolMode {
    /// Toolbar order
    pub const ALL: [ToolMode; 10] = [
        ToolMode::Select,
        ToolMode::Draw,
        ToolMode::Highlight,
        ToolMode::Arrow,
        ToolMode::Rectangle,
        ToolMode::Ellipse,
        ToolMode::Line,
        ToolMode::Text,
        ToolMode::Blur,
        ToolMode::Crop,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ToolMode::Select => "Select",
            ToolMode::Draw => "Draw",
            ToolMode::Highlight => "Highlight",
            ToolMode::Arrow => "Arrow",
            ToolMode::Rectangle => "Rectangle",
            ToolMode::Ellipse => "Ellipse",
            ToolMode::Line => "Line",
            ToolMode::Text => "Text",
            ToolMode::Blur => "Blur",
            ToolMode::Crop => "Crop",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            ToolMode::Select => "⬉",
            ToolMode::Draw => "✏",
            ToolMode::Highlight => "🖍",
            ToolMode::Arrow => "➡",
            ToolMode::Rectangle => "⬜",
            ToolMode::Ellipse => "⭕",
            ToolMode::Line => "╱",
            ToolMode::Text => "T",
            ToolMode::Blur => "░",
            ToolMode::Crop => "✂",
        }
    }

    /// Single-letter keyboard shortcut
    pub fn shortcut(&self) -> char {
        match self {
            ToolMode::Select => 'v',
            ToolMode::Draw => 'd',
            ToolMode::Highlight => 'h',
            ToolMode::Arrow => 'a',
            ToolMode::Rectangle => 'r',
            ToolMode::Ellipse => 'c',
            ToolMode::Line => 'l',
            ToolMode::Text => 't',
            ToolMode::Blur => 'b',
            ToolMode::Crop => 'x',
        }
    }

    pub fn from_shortcut(key: char) -> Option<Self> {
        let key = key.to_ascii_lowercase();
        Self::ALL.into_iter().find(|mode| mode.shortcut() == key)
    }

    /// Select and text leave pointer-down alone instead of creating shapes
    pub fn creates_on_pointer_down(&self) -> bool {
        !matches!(self, ToolMode::Select | ToolMode::Text)
    }
}

impl std::fmt::Display for ToolMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
