use egui::{Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};

use super::Element;
use crate::element::common::{self, Pen};

/// Arrowhead side length relative to the pen width
pub const ARROW_HEAD_SCALE: f32 = 3.0;

/// Straight segment between two points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    id: usize,
    start: Pos2,
    end: Pos2,
    pen: Pen,
}

impl Line {
    pub fn new(id: usize, start: Pos2, end: Pos2, pen: Pen) -> Self {
        Self { id, start, end, pen }
    }

    pub fn set_end(&mut self, end: Pos2) {
        self.end = end;
    }

    pub fn start(&self) -> Pos2 {
        self.start
    }

    pub fn end(&self) -> Pos2 {
        self.end
    }

    pub fn pen(&self) -> Pen {
        self.pen
    }
}

impl Element for Line {
    fn id(&self) -> usize {
        self.id
    }

    fn element_type(&self) -> &'static str {
        "line"
    }

    fn rect(&self) -> Rect {
        common::calculate_bounds(&[self.start, self.end], self.pen.width / 2.0)
    }

    fn hit_test(&self, pos: Pos2) -> bool {
        common::distance_to_line_segment(pos, self.start, self.end)
            <= self.pen.width / 2.0 + common::HIT_TEST_PADDING
    }

    fn translate(&mut self, delta: Vec2) {
        self.start += delta;
        self.end += delta;
    }
}

/// Isosceles triangle centered on the arrow tip
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArrowHead {
    pub center: Pos2,
    pub size: f32,
    /// Drag direction in radians, measured like `atan2(dy, dx)`
    pub angle: f32,
}

impl ArrowHead {
    pub fn new(start: Pos2, tip: Pos2, pen_width: f32) -> Self {
        Self {
            center: tip,
            size: pen_width * ARROW_HEAD_SCALE,
            angle: (tip.y - start.y).atan2(tip.x - start.x),
        }
    }

    /// Triangle vertices, apex first. The apex points along `angle`.
    pub fn points(&self) -> [Pos2; 3] {
        let half = self.size / 2.0;
        let (sin, cos) = self.angle.sin_cos();
        let along = Vec2::new(cos, sin);
        let across = Vec2::new(-sin, cos);
        [
            self.center + along * half,
            self.center - along * half + across * half,
            self.center - along * half - across * half,
        ]
    }
}

/// Line with a triangular head at its end point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arrow {
    id: usize,
    start: Pos2,
    end: Pos2,
    pen: Pen,
    head: Option<ArrowHead>,
}

impl Arrow {
    pub fn new(id: usize, start: Pos2, end: Pos2, pen: Pen) -> Self {
        Self {
            id,
            start,
            end,
            pen,
            head: None,
        }
    }

    /// Move the tip and replace the head with one oriented along the new
    /// drag angle.
    pub fn set_end(&mut self, end: Pos2) {
        self.end = end;
        self.head = Some(ArrowHead::new(self.start, end, self.pen.width));
    }

    pub fn start(&self) -> Pos2 {
        self.start
    }

    pub fn end(&self) -> Pos2 {
        self.end
    }

    pub fn pen(&self) -> Pen {
        self.pen
    }

    /// `None` until the pointer has moved at least once
    pub fn head(&self) -> Option<&ArrowHead> {
        self.head.as_ref()
    }
}

impl Element for Arrow {
    fn id(&self) -> usize {
        self.id
    }

    fn element_type(&self) -> &'static str {
        "arrow"
    }

    fn rect(&self) -> Rect {
        let mut points = vec![self.start, self.end];
        if let Some(head) = &self.head {
            points.extend(head.points());
        }
        common::calculate_bounds(&points, self.pen.width / 2.0)
    }

    fn hit_test(&self, pos: Pos2) -> bool {
        let near_shaft = common::distance_to_line_segment(pos, self.start, self.end)
            <= self.pen.width / 2.0 + common::HIT_TEST_PADDING;
        near_shaft
            || self.head.is_some_and(|head| {
                common::calculate_bounds(&head.points(), common::HIT_TEST_PADDING).contains(pos)
            })
    }

    fn translate(&mut self, delta: Vec2) {
        self.start += delta;
        self.end += delta;
        if let Some(head) = &mut self.head {
            head.center += delta;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn head_apex_points_along_drag() {
        let head = ArrowHead::new(Pos2::ZERO, Pos2::new(10.0, 0.0), 2.0);
        let [apex, left, right] = head.points();
        assert!((head.size - 6.0).abs() < 1e-5);
        assert!((apex.x - 13.0).abs() < 1e-4 && apex.y.abs() < 1e-4);
        assert!((left.x - 7.0).abs() < 1e-4);
        assert!((right.x - 7.0).abs() < 1e-4);
        assert!((left.y + right.y).abs() < 1e-4);
    }
}
