use egui::{Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};

use super::Element;
use crate::raster::RasterId;

/// Flattened raster pasted over the surface, produced by the blur tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patch {
    id: usize,
    raster: RasterId,
    rect: Rect,
}

impl Patch {
    pub fn new(id: usize, raster: RasterId, rect: Rect) -> Self {
        Self { id, raster, rect }
    }

    pub fn raster(&self) -> RasterId {
        self.raster
    }
}

impl Element for Patch {
    fn id(&self) -> usize {
        self.id
    }

    fn element_type(&self) -> &'static str {
        "patch"
    }

    fn rect(&self) -> Rect {
        self.rect
    }

    fn hit_test(&self, pos: Pos2) -> bool {
        self.rect.contains(pos)
    }

    fn translate(&mut self, delta: Vec2) {
        self.rect = self.rect.translate(delta);
    }
}
