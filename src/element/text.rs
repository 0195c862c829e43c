use egui::{Color32, Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};

use super::Element;
use crate::element::common;

pub const PLACEHOLDER_TEXT: &str = "Type here";

/// Single-line text label anchored at its top-left corner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    id: usize,
    position: Pos2,
    content: String,
    color: Color32,
    size: f32,
    /// Still showing the placeholder; the first typed character replaces it
    #[serde(default)]
    placeholder: bool,
}

impl Text {
    pub fn new(id: usize, position: Pos2, content: impl Into<String>, color: Color32, size: f32) -> Self {
        Self {
            id,
            position,
            content: content.into(),
            color,
            size,
            placeholder: false,
        }
    }

    pub fn placeholder(id: usize, position: Pos2, color: Color32, size: f32) -> Self {
        Self {
            placeholder: true,
            ..Self::new(id, position, PLACEHOLDER_TEXT, color, size)
        }
    }

    pub fn push_str(&mut self, input: &str) {
        if self.placeholder {
            self.content.clear();
            self.placeholder = false;
        }
        self.content.push_str(input);
    }

    pub fn backspace(&mut self) {
        if self.placeholder {
            self.content.clear();
            self.placeholder = false;
        } else {
            self.content.pop();
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn position(&self) -> Pos2 {
        self.position
    }

    pub fn color(&self) -> Color32 {
        self.color
    }

    pub fn size(&self) -> f32 {
        self.size
    }
}

impl Element for Text {
    fn id(&self) -> usize {
        self.id
    }

    fn element_type(&self) -> &'static str {
        "text"
    }

    fn rect(&self) -> Rect {
        // Estimated from the font size; exact metrics live in the renderer
        let chars = self.content.chars().count().max(1) as f32;
        Rect::from_min_size(
            self.position,
            Vec2::new(
                self.size * common::TEXT_CHAR_WIDTH_FACTOR * chars,
                self.size * common::TEXT_LINE_HEIGHT_FACTOR,
            ),
        )
    }

    fn hit_test(&self, pos: Pos2) -> bool {
        self.rect().expand(common::HIT_TEST_PADDING).contains(pos)
    }

    fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }
}
