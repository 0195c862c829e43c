use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use image::RgbaImage;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of an immutable pixel buffer held by a [`RasterStore`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RasterId(Uuid);

impl RasterId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RasterId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RasterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Shared pixel buffers referenced by the surface scene.
///
/// Buffers are never mutated once inserted; crop and blur always insert a
/// new buffer. Cloning the store only bumps reference counts, which is what
/// lets every history snapshot carry the rasters it needs.
#[derive(Clone, Default)]
pub struct RasterStore {
    rasters: HashMap<RasterId, Arc<RgbaImage>>,
}

impl fmt::Debug for RasterStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RasterStore")
            .field("len", &self.rasters.len())
            .finish()
    }
}

impl RasterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a buffer and return its new id
    pub fn insert(&mut self, image: RgbaImage) -> RasterId {
        let id = RasterId::new();
        self.rasters.insert(id, Arc::new(image));
        id
    }

    pub fn get(&self, id: RasterId) -> Option<&Arc<RgbaImage>> {
        self.rasters.get(&id)
    }

    pub fn contains(&self, id: RasterId) -> bool {
        self.rasters.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.rasters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rasters.is_empty()
    }

    /// Drop every buffer whose id is not listed
    pub fn retain_only(&mut self, keep: &[RasterId]) {
        self.rasters.retain(|id, _| keep.contains(id));
    }

    /// Copy the listed buffers (by reference) into a new store
    pub fn subset(&self, ids: &[RasterId]) -> Self {
        let rasters = ids
            .iter()
            .filter_map(|id| self.rasters.get(id).map(|img| (*id, Arc::clone(img))))
            .collect();
        Self { rasters }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subset_shares_buffers() {
        let mut store = RasterStore::new();
        let a = store.insert(RgbaImage::new(2, 2));
        let b = store.insert(RgbaImage::new(3, 3));

        let sub = store.subset(&[a]);
        assert_eq!(sub.len(), 1);
        assert!(sub.contains(a));
        assert!(!sub.contains(b));
        assert!(Arc::ptr_eq(sub.get(a).unwrap(), store.get(a).unwrap()));
    }

    #[test]
    fn retain_only_drops_unlisted() {
        let mut store = RasterStore::new();
        let a = store.insert(RgbaImage::new(1, 1));
        let b = store.insert(RgbaImage::new(1, 1));
        store.retain_only(&[b]);
        assert!(!store.contains(a));
        assert!(store.contains(b));
    }
}
