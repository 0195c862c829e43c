use egui::{Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};

use super::Element;
use crate::element::common::{self, Pen};

/// Unfilled rectangle outline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    id: usize,
    rect: Rect,
    pen: Pen,
}

impl Rectangle {
    pub fn new(id: usize, rect: Rect, pen: Pen) -> Self {
        Self { id, rect, pen }
    }

    /// Box spanned by the drag start and the current pointer.
    ///
    /// The box is anchored at the min corner so dragging in any direction
    /// yields the same rectangle.
    pub fn resize_to(&mut self, start: Pos2, current: Pos2) {
        self.rect = common::drag_rect(start, current);
    }

    pub fn left(&self) -> f32 {
        self.rect.min.x
    }

    pub fn top(&self) -> f32 {
        self.rect.min.y
    }

    pub fn width(&self) -> f32 {
        self.rect.width()
    }

    pub fn height(&self) -> f32 {
        self.rect.height()
    }

    pub fn pen(&self) -> Pen {
        self.pen
    }
}

impl Element for Rectangle {
    fn id(&self) -> usize {
        self.id
    }

    fn element_type(&self) -> &'static str {
        "rectangle"
    }

    fn rect(&self) -> Rect {
        self.rect
    }

    fn hit_test(&self, pos: Pos2) -> bool {
        self.rect
            .expand(self.pen.width / 2.0 + common::HIT_TEST_PADDING)
            .contains(pos)
    }

    fn translate(&mut self, delta: Vec2) {
        self.rect = self.rect.translate(delta);
    }
}

/// Unfilled ellipse outline, stored as center and radii
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ellipse {
    id: usize,
    center: Pos2,
    radius: Vec2,
    pen: Pen,
}

impl Ellipse {
    pub fn new(id: usize, center: Pos2, radius: Vec2, pen: Pen) -> Self {
        Self {
            id,
            center,
            radius,
            pen,
        }
    }

    /// Radii are half the absolute drag deltas and the ellipse stays
    /// centered on the drag start, unlike [`Rectangle::resize_to`].
    pub fn resize_to(&mut self, start: Pos2, current: Pos2) {
        self.center = start;
        self.radius = Vec2::new(
            (current.x - start.x).abs() / 2.0,
            (current.y - start.y).abs() / 2.0,
        );
    }

    pub fn center(&self) -> Pos2 {
        self.center
    }

    pub fn rx(&self) -> f32 {
        self.radius.x
    }

    pub fn ry(&self) -> f32 {
        self.radius.y
    }

    pub fn pen(&self) -> Pen {
        self.pen
    }

    /// Outline approximated by a closed polygon
    pub fn outline(&self, segments: usize) -> Vec<Pos2> {
        let segments = segments.max(8);
        (0..segments)
            .map(|i| {
                let t = i as f32 / segments as f32 * std::f32::consts::TAU;
                Pos2::new(
                    self.center.x + self.radius.x * t.cos(),
                    self.center.y + self.radius.y * t.sin(),
                )
            })
            .collect()
    }
}

impl Element for Ellipse {
    fn id(&self) -> usize {
        self.id
    }

    fn element_type(&self) -> &'static str {
        "ellipse"
    }

    fn rect(&self) -> Rect {
        Rect::from_center_size(self.center, self.radius * 2.0)
    }

    fn hit_test(&self, pos: Pos2) -> bool {
        self.rect()
            .expand(self.pen.width / 2.0 + common::HIT_TEST_PADDING)
            .contains(pos)
    }

    fn translate(&mut self, delta: Vec2) {
        self.center += delta;
    }
}
