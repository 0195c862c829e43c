use std::sync::Arc;

use egui::{Pos2, Rect, Vec2};
use image::RgbaImage;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::element::{Annotation, Element};
use crate::error::{EditorError, EditorResult};
use crate::raster::{RasterId, RasterStore};

/// Serialized state of a [`Surface`], as stored in the history.
///
/// The scene is JSON; pixel buffers are carried alongside by reference
/// instead of being encoded into the text.
#[derive(Debug, Clone)]
pub struct Snapshot {
    scene: String,
    rasters: RasterStore,
}

impl Snapshot {
    pub fn scene(&self) -> &str {
        &self.scene
    }

    pub fn rasters(&self) -> &RasterStore {
        &self.rasters
    }
}

/// The editable screenshot: a raster background with vector annotations on
/// top, painted in order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Surface {
    width: u32,
    height: u32,
    background: Option<RasterId>,
    annotations: Vec<Annotation>,
    next_id: usize,
    #[serde(skip)]
    rasters: RasterStore,
}

impl Surface {
    /// Empty surface with no background image
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            background: None,
            annotations: Vec::new(),
            next_id: 1,
            rasters: RasterStore::new(),
        }
    }

    /// Surface sized to, and backed by, the given screenshot
    pub fn from_image(image: RgbaImage) -> Self {
        let mut surface = Self::new(image.width(), image.height());
        let id = surface.rasters.insert(image);
        surface.background = Some(id);
        surface
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_min_size(Pos2::ZERO, self.size())
    }

    pub fn background_id(&self) -> Option<RasterId> {
        self.background
    }

    pub fn background(&self) -> Option<&Arc<RgbaImage>> {
        self.background.and_then(|id| self.rasters.get(id))
    }

    pub fn rasters(&self) -> &RasterStore {
        &self.rasters
    }

    pub fn insert_raster(&mut self, image: RgbaImage) -> RasterId {
        self.rasters.insert(image)
    }

    pub fn raster(&self, id: RasterId) -> Option<&Arc<RgbaImage>> {
        self.rasters.get(id)
    }

    /// Replace the background with a new image and resize the surface to it.
    /// Every annotation is dropped.
    pub fn replace_background(&mut self, image: RgbaImage) {
        self.width = image.width();
        self.height = image.height();
        self.annotations.clear();
        let id = self.rasters.insert(image);
        self.background = Some(id);
        self.collect_rasters();
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    /// Reserve an id for an annotation that will be added later
    pub fn allocate_id(&mut self) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Add an annotation on top of all others
    pub fn add(&mut self, annotation: Annotation) {
        debug!(
            "Adding {} #{} to surface",
            annotation.element_type(),
            annotation.id()
        );
        self.next_id = self.next_id.max(annotation.id() + 1);
        self.annotations.push(annotation);
    }

    pub fn find(&self, id: usize) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.id() == id)
    }

    pub fn find_mut(&mut self, id: usize) -> Option<&mut Annotation> {
        self.annotations.iter_mut().find(|a| a.id() == id)
    }

    pub fn remove(&mut self, id: usize) -> Option<Annotation> {
        let index = self.annotations.iter().position(|a| a.id() == id)?;
        let removed = self.annotations.remove(index);
        if matches!(removed, Annotation::Patch(_)) {
            self.collect_rasters();
        }
        Some(removed)
    }

    pub fn clear_annotations(&mut self) {
        self.annotations.clear();
        self.collect_rasters();
    }

    /// Topmost selectable annotation under the given position
    pub fn topmost_at(&self, pos: Pos2) -> Option<usize> {
        self.annotations
            .iter()
            .rev()
            .find(|a| a.selectable() && a.hit_test(pos))
            .map(|a| a.id())
    }

    fn referenced_rasters(&self) -> Vec<RasterId> {
        self.background
            .into_iter()
            .chain(self.annotations.iter().filter_map(|a| match a {
                Annotation::Patch(p) => Some(p.raster()),
                _ => None,
            }))
            .collect()
    }

    /// Drop buffers nothing on the surface refers to any more.
    /// Snapshots keep their own references, so undo still finds them.
    fn collect_rasters(&mut self) {
        let keep = self.referenced_rasters();
        self.rasters.retain_only(&keep);
    }

    /// Serialize the current state
    pub fn snapshot(&self) -> EditorResult<Snapshot> {
        let scene = serde_json::to_string(self)?;
        let rasters = self.rasters.subset(&self.referenced_rasters());
        Ok(Snapshot { scene, rasters })
    }

    /// Replace the whole surface with the snapshot's state.
    ///
    /// The scene is fully deserialized and validated before the live surface
    /// is touched, so a failed restore leaves it unchanged.
    pub fn restore(&mut self, snapshot: &Snapshot) -> EditorResult<()> {
        let mut restored: Surface = serde_json::from_str(&snapshot.scene)?;
        if let Some(missing) = restored
            .referenced_rasters()
            .into_iter()
            .find(|id| !snapshot.rasters.contains(*id))
        {
            return Err(EditorError::MissingRaster(missing));
        }
        restored.rasters = snapshot.rasters.clone();
        *self = restored;
        Ok(())
    }
}

impl Default for Surface {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{Pen, factory};
    use egui::Color32;

    #[test]
    fn snapshot_round_trip_keeps_rasters() {
        let mut surface = Surface::from_image(RgbaImage::new(4, 3));
        let id = surface.allocate_id();
        surface.add(factory::create_line(
            id,
            Pos2::ZERO,
            Pos2::new(3.0, 2.0),
            Pen::new(Color32::RED, 2.0),
        ));
        let snapshot = surface.snapshot().unwrap();

        let mut other = Surface::default();
        other.restore(&snapshot).unwrap();
        assert_eq!(other.width(), 4);
        assert_eq!(other.annotations().len(), 1);
        assert!(other.background().is_some());
    }

    #[test]
    fn restore_rejects_missing_raster() {
        let surface = Surface::from_image(RgbaImage::new(1, 1));
        let snapshot = Snapshot {
            scene: serde_json::to_string(&surface).unwrap(),
            rasters: RasterStore::new(),
        };
        let mut target = Surface::new(9, 9);
        assert!(matches!(
            target.restore(&snapshot),
            Err(EditorError::MissingRaster(_))
        ));
        assert_eq!(target.width(), 9);
    }
}
