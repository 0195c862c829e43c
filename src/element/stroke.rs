use egui::{Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};

use super::Element;
use crate::element::common::{self, Pen};

/// Freehand polyline, used by both the draw and the highlight tools
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    id: usize,
    points: Vec<Pos2>,
    pen: Pen,
}

impl Stroke {
    pub fn new(id: usize, points: Vec<Pos2>, pen: Pen) -> Self {
        Self { id, points, pen }
    }

    pub fn add_point(&mut self, point: Pos2) {
        // Skip duplicates from pointer events that did not actually move
        if self.points.last() != Some(&point) {
            self.points.push(point);
        }
    }

    pub fn points(&self) -> &[Pos2] {
        &self.points
    }

    pub fn pen(&self) -> Pen {
        self.pen
    }
}

impl Element for Stroke {
    fn id(&self) -> usize {
        self.id
    }

    fn element_type(&self) -> &'static str {
        "stroke"
    }

    fn rect(&self) -> Rect {
        common::calculate_bounds(&self.points, self.pen.width / 2.0)
    }

    fn hit_test(&self, pos: Pos2) -> bool {
        let tolerance = self.pen.width / 2.0 + common::HIT_TEST_PADDING;
        match self.points.as_slice() {
            [] => false,
            [only] => (pos - *only).length() <= tolerance,
            points => points
                .windows(2)
                .any(|w| common::distance_to_line_segment(pos, w[0], w[1]) <= tolerance),
        }
    }

    fn translate(&mut self, delta: Vec2) {
        for point in &mut self.points {
            *point += delta;
        }
    }
}
