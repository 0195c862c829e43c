use egui::{Pos2, Rect, Vec2};

use crate::element::{self, Annotation, Element, Pen, factory};
use crate::tools::ToolMode;

/// What a pointer-down started
#[derive(Debug, Clone, PartialEq)]
pub enum GestureKind {
    /// A vector object being sized; committed to the surface on release
    Shape(Annotation),
    /// Region to blur on release
    Blur(Rect),
    /// Pending crop selection
    Crop(Rect),
    /// Dragging an existing annotation in select mode
    Move { id: usize, moved: bool },
}

/// State of one pointer-down → move → up sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct Gesture {
    start: Pos2,
    last: Pos2,
    kind: GestureKind,
}

impl Gesture {
    /// Start a shape gesture for the given mode. Returns `None` for modes
    /// that do not create an object on pointer-down.
    pub fn begin_shape(mode: ToolMode, pos: Pos2, id: usize, pen: Pen) -> Option<Self> {
        let kind = match mode {
            ToolMode::Rectangle => GestureKind::Shape(factory::create_rectangle(
                id,
                Rect::from_min_size(pos, Vec2::splat(1.0)),
                pen,
            )),
            ToolMode::Ellipse => {
                GestureKind::Shape(factory::create_ellipse(id, pos, Vec2::splat(1.0), pen))
            }
            ToolMode::Line => GestureKind::Shape(factory::create_line(id, pos, pos, pen)),
            ToolMode::Arrow => GestureKind::Shape(factory::create_arrow(id, pos, pos, pen)),
            ToolMode::Draw | ToolMode::Highlight => {
                GestureKind::Shape(factory::create_stroke(id, vec![pos], pen))
            }
            ToolMode::Blur => GestureKind::Blur(Rect::from_min_size(pos, Vec2::splat(1.0))),
            ToolMode::Crop => GestureKind::Crop(Rect::from_min_size(pos, Vec2::ZERO)),
            ToolMode::Select | ToolMode::Text => return None,
        };
        Some(Self {
            start: pos,
            last: pos,
            kind,
        })
    }

    /// Start dragging an annotation already on the surface
    pub fn begin_move(pos: Pos2, id: usize) -> Self {
        Self {
            start: pos,
            last: pos,
            kind: GestureKind::Move { id, moved: false },
        }
    }

    pub fn kind(&self) -> &GestureKind {
        &self.kind
    }

    pub fn into_kind(self) -> GestureKind {
        self.kind
    }

    /// Apply a pointer move. For move gestures the returned delta is what
    /// the dragged annotation has to be translated by.
    pub fn update(&mut self, pos: Pos2) -> Option<Vec2> {
        let start = self.start;
        let delta = pos - self.last;
        self.last = pos;

        match &mut self.kind {
            GestureKind::Shape(shape) => {
                match shape {
                    Annotation::Rectangle(rect) => rect.resize_to(start, pos),
                    Annotation::Ellipse(ellipse) => ellipse.resize_to(start, pos),
                    Annotation::Line(line) => line.set_end(pos),
                    Annotation::Arrow(arrow) => arrow.set_end(pos),
                    Annotation::Stroke(stroke) => stroke.add_point(pos),
                    Annotation::Text(_) | Annotation::Patch(_) => {}
                }
                None
            }
            GestureKind::Blur(region) | GestureKind::Crop(region) => {
                *region = element::drag_rect(start, pos);
                None
            }
            GestureKind::Move { moved, .. } => {
                if delta == Vec2::ZERO {
                    return None;
                }
                *moved = true;
                Some(delta)
            }
        }
    }

    /// Id of the object this gesture creates or drags
    pub fn target_id(&self) -> Option<usize> {
        match &self.kind {
            GestureKind::Shape(shape) => Some(shape.id()),
            GestureKind::Move { id, .. } => Some(*id),
            GestureKind::Blur(_) | GestureKind::Crop(_) => None,
        }
    }
}
