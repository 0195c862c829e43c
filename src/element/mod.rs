use egui::{Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};

mod common;
pub mod line;
pub mod patch;
pub mod shape;
pub mod stroke;
pub mod text;

pub use common::{Pen, drag_rect};
pub use line::{Arrow, ArrowHead, Line};
pub use patch::Patch;
pub use shape::{Ellipse, Rectangle};
pub use stroke::Stroke;
pub use text::{PLACEHOLDER_TEXT, Text};

/// Common trait that all surface annotations implement
pub trait Element {
    /// Get the surface-unique identifier for this element
    fn id(&self) -> usize;

    /// Get the element type as a string
    fn element_type(&self) -> &'static str;

    /// Get the bounding rectangle for this element
    fn rect(&self) -> Rect;

    /// Test if the element contains the given position
    fn hit_test(&self, pos: Pos2) -> bool;

    /// Translate the element by the given delta
    fn translate(&mut self, delta: Vec2);

    /// Whether the select tool may pick this element
    fn selectable(&self) -> bool {
        true
    }
}

/// Every kind of vector object that can sit on top of the background
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Annotation {
    Rectangle(Rectangle),
    Ellipse(Ellipse),
    Line(Line),
    Arrow(Arrow),
    Stroke(Stroke),
    Text(Text),
    Patch(Patch),
}

impl Annotation {
    pub fn as_text_mut(&mut self) -> Option<&mut Text> {
        match self {
            Annotation::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&Text> {
        match self {
            Annotation::Text(t) => Some(t),
            _ => None,
        }
    }
}

impl Element for Annotation {
    fn id(&self) -> usize {
        match self {
            Annotation::Rectangle(r) => r.id(),
            Annotation::Ellipse(e) => e.id(),
            Annotation::Line(l) => l.id(),
            Annotation::Arrow(a) => a.id(),
            Annotation::Stroke(s) => s.id(),
            Annotation::Text(t) => t.id(),
            Annotation::Patch(p) => p.id(),
        }
    }

    fn element_type(&self) -> &'static str {
        match self {
            Annotation::Rectangle(r) => r.element_type(),
            Annotation::Ellipse(e) => e.element_type(),
            Annotation::Line(l) => l.element_type(),
            Annotation::Arrow(a) => a.element_type(),
            Annotation::Stroke(s) => s.element_type(),
            Annotation::Text(t) => t.element_type(),
            Annotation::Patch(p) => p.element_type(),
        }
    }

    fn rect(&self) -> Rect {
        match self {
            Annotation::Rectangle(r) => r.rect(),
            Annotation::Ellipse(e) => e.rect(),
            Annotation::Line(l) => l.rect(),
            Annotation::Arrow(a) => a.rect(),
            Annotation::Stroke(s) => s.rect(),
            Annotation::Text(t) => t.rect(),
            Annotation::Patch(p) => p.rect(),
        }
    }

    fn hit_test(&self, pos: Pos2) -> bool {
        match self {
            Annotation::Rectangle(r) => r.hit_test(pos),
            Annotation::Ellipse(e) => e.hit_test(pos),
            Annotation::Line(l) => l.hit_test(pos),
            Annotation::Arrow(a) => a.hit_test(pos),
            Annotation::Stroke(s) => s.hit_test(pos),
            Annotation::Text(t) => t.hit_test(pos),
            Annotation::Patch(p) => p.hit_test(pos),
        }
    }

    fn translate(&mut self, delta: Vec2) {
        match self {
            Annotation::Rectangle(r) => r.translate(delta),
            Annotation::Ellipse(e) => e.translate(delta),
            Annotation::Line(l) => l.translate(delta),
            Annotation::Arrow(a) => a.translate(delta),
            Annotation::Stroke(s) => s.translate(delta),
            Annotation::Text(t) => t.translate(delta),
            Annotation::Patch(p) => p.translate(delta),
        }
    }

    fn selectable(&self) -> bool {
        // Blur patches are baked-in pixels, not editable objects
        !matches!(self, Annotation::Patch(_))
    }
}

/// Factory functions for creating annotations
pub mod factory {
    use super::*;
    use crate::raster::RasterId;
    use egui::Color32;

    pub fn create_rectangle(id: usize, rect: Rect, pen: Pen) -> Annotation {
        Annotation::Rectangle(Rectangle::new(id, rect, pen))
    }

    pub fn create_ellipse(id: usize, center: Pos2, radius: Vec2, pen: Pen) -> Annotation {
        Annotation::Ellipse(Ellipse::new(id, center, radius, pen))
    }

    pub fn create_line(id: usize, start: Pos2, end: Pos2, pen: Pen) -> Annotation {
        Annotation::Line(Line::new(id, start, end, pen))
    }

    pub fn create_arrow(id: usize, start: Pos2, end: Pos2, pen: Pen) -> Annotation {
        let mut arrow = Arrow::new(id, start, start, pen);
        if end != start {
            arrow.set_end(end);
        }
        Annotation::Arrow(arrow)
    }

    pub fn create_stroke(id: usize, points: Vec<Pos2>, pen: Pen) -> Annotation {
        Annotation::Stroke(Stroke::new(id, points, pen))
    }

    pub fn create_text(id: usize, position: Pos2, content: &str, color: Color32, size: f32) -> Annotation {
        Annotation::Text(Text::new(id, position, content, color, size))
    }

    pub fn create_patch(id: usize, raster: RasterId, rect: Rect) -> Annotation {
        Annotation::Patch(Patch::new(id, raster, rect))
    }
}
