//! Pixel-level region transforms: crop and box blur.

use egui::{Pos2, Rect, Vec2};
use image::{RgbaImage, imageops};
use log::info;

use crate::element::factory;
use crate::error::{EditorError, EditorResult};
use crate::rasterize;
use crate::surface::Surface;

/// Neighbourhood radius of the blur tool, in pixels
pub const DEFAULT_BLUR_RADIUS: u32 = 5;

/// Integer pixel rectangle inside a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRegion {
    /// Round a surface-space rectangle to whole pixels and clamp it to a
    /// `width` x `height` surface.
    pub fn clamp(rect: Rect, width: u32, height: u32) -> EditorResult<Self> {
        let empty = || EditorError::EmptyRegion {
            left: rect.min.x,
            top: rect.min.y,
            width: rect.width(),
            height: rect.height(),
        };
        if !rect.is_finite() {
            return Err(empty());
        }

        let clamp_x = |v: f32| v.round().clamp(0.0, width as f32) as u32;
        let clamp_y = |v: f32| v.round().clamp(0.0, height as f32) as u32;
        let (left, right) = (clamp_x(rect.min.x), clamp_x(rect.max.x));
        let (top, bottom) = (clamp_y(rect.min.y), clamp_y(rect.max.y));

        if right <= left || bottom <= top {
            return Err(empty());
        }
        Ok(Self {
            x: left,
            y: top,
            width: right - left,
            height: bottom - top,
        })
    }

    pub fn to_rect(self) -> Rect {
        Rect::from_min_size(
            Pos2::new(self.x as f32, self.y as f32),
            Vec2::new(self.width as f32, self.height as f32),
        )
    }
}

/// Box blur: every output pixel's RGB is the unweighted mean of the source
/// pixels within `radius` (Chebyshev distance) that lie inside the image.
/// Edge pixels average over fewer samples; nothing is padded or wrapped.
/// Alpha is copied unchanged.
pub fn box_blur(source: &RgbaImage, radius: u32) -> RgbaImage {
    let (width, height) = source.dimensions();
    let mut output = source.clone();
    let r = radius as i64;

    for y in 0..height as i64 {
        for x in 0..width as i64 {
            let mut sum = [0u64; 3];
            let mut count = 0u64;

            let (y0, y1) = ((y - r).max(0), (y + r).min(height as i64 - 1));
            let (x0, x1) = ((x - r).max(0), (x + r).min(width as i64 - 1));
            for ny in y0..=y1 {
                for nx in x0..=x1 {
                    let p = source.get_pixel(nx as u32, ny as u32);
                    sum[0] += p[0] as u64;
                    sum[1] += p[1] as u64;
                    sum[2] += p[2] as u64;
                    count += 1;
                }
            }

            let out = output.get_pixel_mut(x as u32, y as u32);
            for channel in 0..3 {
                out[channel] = ((sum[channel] + count / 2) / count) as u8;
            }
        }
    }

    output
}

/// Number of samples a blur of `radius` averages for pixel `(x, y)`
pub fn blur_sample_count(x: u32, y: u32, width: u32, height: u32, radius: u32) -> u32 {
    let span = |c: u32, len: u32| {
        let lo = c.saturating_sub(radius);
        let hi = (c + radius).min(len.saturating_sub(1));
        hi - lo + 1
    };
    span(x, width) * span(y, height)
}

/// Flatten the surface and make the selected region its new background.
/// Every annotation is discarded; returns the applied pixel region.
pub fn crop(surface: &mut Surface, selection: Rect) -> EditorResult<PixelRegion> {
    let region = PixelRegion::clamp(selection, surface.width(), surface.height())?;
    let flattened = rasterize::flatten(surface)?;
    let cropped =
        imageops::crop_imm(&flattened, region.x, region.y, region.width, region.height).to_image();

    info!(
        "Cropped surface from {}x{} to {}x{} at ({}, {})",
        surface.width(),
        surface.height(),
        region.width,
        region.height,
        region.x,
        region.y
    );
    surface.replace_background(cropped);
    Ok(region)
}

/// Blur the selected region of the flattened surface and paste the result
/// back as a patch annotation at the same place. Returns the patch id.
pub fn blur(surface: &mut Surface, selection: Rect, radius: u32) -> EditorResult<usize> {
    let region = PixelRegion::clamp(selection, surface.width(), surface.height())?;
    let flattened = rasterize::flatten(surface)?;
    let source =
        imageops::crop_imm(&flattened, region.x, region.y, region.width, region.height).to_image();
    let blurred = box_blur(&source, radius);

    let raster = surface.insert_raster(blurred);
    let id = surface.allocate_id();
    surface.add(factory::create_patch(id, raster, region.to_rect()));

    info!(
        "Blurred {}x{} region at ({}, {}) with radius {}",
        region.width, region.height, region.x, region.y, radius
    );
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_rounds_and_limits_to_surface() {
        let rect = Rect::from_min_max(Pos2::new(-5.2, 3.4), Pos2::new(12.6, 50.0));
        let region = PixelRegion::clamp(rect, 10, 20).unwrap();
        assert_eq!(
            region,
            PixelRegion {
                x: 0,
                y: 3,
                width: 10,
                height: 17
            }
        );
    }

    #[test]
    fn clamp_rejects_regions_outside_surface() {
        let rect = Rect::from_min_size(Pos2::new(30.0, 30.0), Vec2::splat(5.0));
        assert!(matches!(
            PixelRegion::clamp(rect, 10, 10),
            Err(EditorError::EmptyRegion { .. })
        ));
    }

    #[test]
    fn sample_count_shrinks_at_edges() {
        assert_eq!(blur_sample_count(10, 10, 21, 21, 5), 121);
        assert_eq!(blur_sample_count(0, 0, 21, 21, 5), 36);
        assert_eq!(blur_sample_count(0, 10, 21, 21, 5), 66);
    }
}
