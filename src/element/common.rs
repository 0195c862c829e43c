use egui::{Color32, Pos2, Rect};
use serde::{Deserialize, Serialize};

// Common constants for all element types
pub const HIT_TEST_PADDING: f32 = 4.0;
pub const TEXT_CHAR_WIDTH_FACTOR: f32 = 0.6;
pub const TEXT_LINE_HEIGHT_FACTOR: f32 = 1.2;

/// Outline color and width shared by every stroked annotation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pen {
    pub color: Color32,
    pub width: f32,
}

impl Pen {
    pub fn new(color: Color32, width: f32) -> Self {
        Self { color, width }
    }
}

impl Default for Pen {
    fn default() -> Self {
        Self::new(Color32::RED, 4.0)
    }
}

/// Calculate distance from a point to a line segment (useful for stroke hit testing)
pub(crate) fn distance_to_line_segment(point: Pos2, line_start: Pos2, line_end: Pos2) -> f32 {
    let line_vec = line_end - line_start;
    let point_vec = point - line_start;

    let line_len = line_vec.length();
    if line_len == 0.0 {
        return point_vec.length();
    }

    let t = ((point_vec.x * line_vec.x + point_vec.y * line_vec.y) / line_len).clamp(0.0, line_len);
    let projection = line_start + (line_vec * t / line_len);
    (point - projection).length()
}

/// Calculate the bounding box for a set of points
pub(crate) fn calculate_bounds(points: &[Pos2], padding: f32) -> Rect {
    if points.is_empty() {
        return Rect::NOTHING;
    }

    let mut min_x = f32::INFINITY;
    let mut min_y = f32::INFINITY;
    let mut max_x = f32::NEG_INFINITY;
    let mut max_y = f32::NEG_INFINITY;

    for point in points {
        min_x = min_x.min(point.x);
        min_y = min_y.min(point.y);
        max_x = max_x.max(point.x);
        max_y = max_y.max(point.y);
    }

    Rect::from_min_max(
        Pos2::new(min_x - padding, min_y - padding),
        Pos2::new(max_x + padding, max_y + padding),
    )
}

/// Rectangle spanned by two drag points, anchored at the min corner
pub fn drag_rect(start: Pos2, current: Pos2) -> Rect {
    Rect::from_min_max(
        Pos2::new(start.x.min(current.x), start.y.min(current.y)),
        Pos2::new(start.x.max(current.x), start.y.max(current.y)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_projects_onto_segment() {
        let d = distance_to_line_segment(Pos2::new(5.0, 3.0), Pos2::ZERO, Pos2::new(10.0, 0.0));
        assert!((d - 3.0).abs() < 1e-5);

        // Past the end the distance is to the endpoint
        let d = distance_to_line_segment(Pos2::new(13.0, 4.0), Pos2::ZERO, Pos2::new(10.0, 0.0));
        assert!((d - 5.0).abs() < 1e-5);
    }

    #[test]
    fn drag_rect_is_direction_independent() {
        let a = drag_rect(Pos2::new(10.0, 10.0), Pos2::new(50.0, 30.0));
        let b = drag_rect(Pos2::new(50.0, 30.0), Pos2::new(10.0, 10.0));
        assert_eq!(a, b);
        assert_eq!(a.min, Pos2::new(10.0, 10.0));
    }
}
