//! Flattening a [`Surface`] into a single RGBA image.
//!
//! Shapes are drawn with `tiny-skia`; text is laid out with `ab_glyph`
//! using the same proportional font egui renders on screen.

use ab_glyph::{Font, FontRef, PxScale, ScaleFont, point};
use egui::{Color32, Pos2, Rect};
use image::RgbaImage;
use tiny_skia::{
    ColorU8, FillRule, IntSize, LineCap, LineJoin, Paint, PathBuilder, Pixmap, PixmapPaint,
    PremultipliedColorU8, Stroke as SkStroke, Transform,
};

use crate::element::{Annotation, Element, Pen, Text};
use crate::error::{EditorError, EditorResult};
use crate::surface::Surface;

/// Render background and annotations, in paint order, into one image
pub fn flatten(surface: &Surface) -> EditorResult<RgbaImage> {
    let mut pixmap = Pixmap::new(surface.width(), surface.height()).ok_or_else(|| {
        EditorError::Rasterize(format!(
            "invalid surface size {}x{}",
            surface.width(),
            surface.height()
        ))
    })?;

    if let Some(background) = surface.background() {
        let background = to_pixmap(background)?;
        pixmap.draw_pixmap(
            0,
            0,
            background.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );
    }

    let font = FontRef::try_from_slice(epaint_default_fonts::UBUNTU_LIGHT)
        .map_err(|e| EditorError::Rasterize(e.to_string()))?;

    for annotation in surface.annotations() {
        draw_annotation(&mut pixmap, surface, annotation, &font)?;
    }

    Ok(to_image(&pixmap))
}

fn draw_annotation(
    pixmap: &mut Pixmap,
    surface: &Surface,
    annotation: &Annotation,
    font: &FontRef<'_>,
) -> EditorResult<()> {
    match annotation {
        Annotation::Rectangle(rect) => {
            if let Some(r) = sk_rect(rect.rect()) {
                stroke_path(pixmap, &PathBuilder::from_rect(r), rect.pen(), LineCap::Butt);
            }
        }
        Annotation::Ellipse(ellipse) => {
            let bounds = Rect::from_center_size(
                ellipse.center(),
                egui::vec2(ellipse.rx() * 2.0, ellipse.ry() * 2.0),
            );
            if let Some(path) = sk_rect(bounds).and_then(PathBuilder::from_oval) {
                stroke_path(pixmap, &path, ellipse.pen(), LineCap::Butt);
            }
        }
        Annotation::Line(line) => {
            draw_polyline(pixmap, &[line.start(), line.end()], line.pen(), LineCap::Butt);
        }
        Annotation::Arrow(arrow) => {
            draw_polyline(pixmap, &[arrow.start(), arrow.end()], arrow.pen(), LineCap::Round);
            if let Some(head) = arrow.head() {
                fill_polygon(pixmap, &head.points(), arrow.pen().color);
            }
        }
        Annotation::Stroke(stroke) => match stroke.points() {
            [] => {}
            [dot] => {
                if let Some(path) = PathBuilder::from_circle(dot.x, dot.y, stroke.pen().width / 2.0) {
                    fill_path(pixmap, &path, stroke.pen().color);
                }
            }
            points => draw_polyline(pixmap, points, stroke.pen(), LineCap::Round),
        },
        Annotation::Text(text) => draw_text(pixmap, text, font),
        Annotation::Patch(patch) => {
            let raster = surface
                .raster(patch.raster())
                .ok_or(EditorError::MissingRaster(patch.raster()))?;
            let patch_pixmap = to_pixmap(raster)?;
            pixmap.draw_pixmap(
                patch.rect().min.x.round() as i32,
                patch.rect().min.y.round() as i32,
                patch_pixmap.as_ref(),
                &PixmapPaint::default(),
                Transform::identity(),
                None,
            );
        }
    }
    Ok(())
}

fn paint_for(color: Color32) -> Paint<'static> {
    let [r, g, b, a] = color.to_srgba_unmultiplied();
    let mut paint = Paint::default();
    paint.set_color_rgba8(r, g, b, a);
    paint.anti_alias = true;
    paint
}

fn sk_rect(rect: Rect) -> Option<tiny_skia::Rect> {
    tiny_skia::Rect::from_xywh(rect.min.x, rect.min.y, rect.width(), rect.height())
}

fn stroke_path(pixmap: &mut Pixmap, path: &tiny_skia::Path, pen: Pen, cap: LineCap) {
    let stroke = SkStroke {
        width: pen.width,
        line_cap: cap,
        line_join: if cap == LineCap::Round {
            LineJoin::Round
        } else {
            LineJoin::Miter
        },
        ..SkStroke::default()
    };
    pixmap.stroke_path(path, &paint_for(pen.color), &stroke, Transform::identity(), None);
}

fn fill_path(pixmap: &mut Pixmap, path: &tiny_skia::Path, color: Color32) {
    pixmap.fill_path(
        path,
        &paint_for(color),
        FillRule::Winding,
        Transform::identity(),
        None,
    );
}

fn draw_polyline(pixmap: &mut Pixmap, points: &[Pos2], pen: Pen, cap: LineCap) {
    let mut builder = PathBuilder::new();
    let Some((first, rest)) = points.split_first() else {
        return;
    };
    builder.move_to(first.x, first.y);
    for p in rest {
        builder.line_to(p.x, p.y);
    }
    if let Some(path) = builder.finish() {
        stroke_path(pixmap, &path, pen, cap);
    }
}

fn fill_polygon(pixmap: &mut Pixmap, points: &[Pos2], color: Color32) {
    let mut builder = PathBuilder::new();
    let Some((first, rest)) = points.split_first() else {
        return;
    };
    builder.move_to(first.x, first.y);
    for p in rest {
        builder.line_to(p.x, p.y);
    }
    builder.close();
    if let Some(path) = builder.finish() {
        fill_path(pixmap, &path, color);
    }
}

fn draw_text(pixmap: &mut Pixmap, text: &Text, font: &FontRef<'_>) {
    let scaled = font.as_scaled(PxScale::from(text.size()));
    let [r, g, b, a] = text.color().to_srgba_unmultiplied();
    let (width, height) = (pixmap.width() as i32, pixmap.height() as i32);
    let pixels = pixmap.pixels_mut();

    let mut caret = point(text.position().x, text.position().y + scaled.ascent());
    let mut previous = None;
    for c in text.content().chars() {
        let glyph_id = scaled.glyph_id(c);
        if let Some(prev) = previous {
            caret.x += scaled.kern(prev, glyph_id);
        }
        let glyph = glyph_id.with_scale_and_position(scaled.scale(), caret);
        caret.x += scaled.h_advance(glyph_id);
        previous = Some(glyph_id);

        let Some(outlined) = font.outline_glyph(glyph) else {
            continue;
        };
        let bounds = outlined.px_bounds();
        outlined.draw(|gx, gy, coverage| {
            let x = bounds.min.x as i32 + gx as i32;
            let y = bounds.min.y as i32 + gy as i32;
            if x < 0 || y < 0 || x >= width || y >= height {
                return;
            }
            let index = (y * width + x) as usize;
            pixels[index] = blend_over(pixels[index], [r, g, b], a as f32 / 255.0 * coverage);
        });
    }
}

/// Source-over blend of a straight color with the given opacity onto a
/// premultiplied destination pixel
fn blend_over(dst: PremultipliedColorU8, rgb: [u8; 3], alpha: f32) -> PremultipliedColorU8 {
    let alpha = alpha.clamp(0.0, 1.0);
    let keep = 1.0 - alpha;
    let channel = |src: u8, dst: u8| (src as f32 * alpha + dst as f32 * keep).round();
    let out_a = (255.0 * alpha + dst.alpha() as f32 * keep).round().min(255.0);
    let clamp = |v: f32| v.min(out_a) as u8;
    PremultipliedColorU8::from_rgba(
        clamp(channel(rgb[0], dst.red())),
        clamp(channel(rgb[1], dst.green())),
        clamp(channel(rgb[2], dst.blue())),
        out_a as u8,
    )
    .unwrap_or(dst)
}

fn to_pixmap(image: &RgbaImage) -> EditorResult<Pixmap> {
    let size = IntSize::from_wh(image.width(), image.height()).ok_or_else(|| {
        EditorError::Rasterize(format!(
            "invalid raster size {}x{}",
            image.width(),
            image.height()
        ))
    })?;
    let data = image
        .pixels()
        .flat_map(|p| {
            let c = ColorU8::from_rgba(p[0], p[1], p[2], p[3]).premultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect();
    Pixmap::from_vec(data, size)
        .ok_or_else(|| EditorError::Rasterize("raster buffer size mismatch".to_owned()))
}

fn to_image(pixmap: &Pixmap) -> RgbaImage {
    let data = pixmap
        .pixels()
        .iter()
        .flat_map(|p| {
            let c = p.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect();
    RgbaImage::from_raw(pixmap.width(), pixmap.height(), data)
        .unwrap_or_else(|| RgbaImage::new(pixmap.width(), pixmap.height()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::factory;
    use image::Rgba;

    #[test]
    fn flatten_keeps_background_pixels() {
        let background = RgbaImage::from_pixel(8, 6, Rgba([10, 20, 30, 255]));
        let surface = Surface::from_image(background);
        let flat = flatten(&surface).unwrap();
        assert_eq!(flat.dimensions(), (8, 6));
        assert_eq!(flat.get_pixel(4, 3), &Rgba([10, 20, 30, 255]));
    }

    #[test]
    fn flatten_draws_patches_at_their_position() {
        let mut surface = Surface::from_image(RgbaImage::from_pixel(8, 8, Rgba([0, 0, 0, 255])));
        let raster = surface.insert_raster(RgbaImage::from_pixel(2, 2, Rgba([200, 100, 50, 255])));
        let id = surface.allocate_id();
        surface.add(factory::create_patch(
            id,
            raster,
            Rect::from_min_size(Pos2::new(3.0, 4.0), egui::vec2(2.0, 2.0)),
        ));

        let flat = flatten(&surface).unwrap();
        assert_eq!(flat.get_pixel(3, 4), &Rgba([200, 100, 50, 255]));
        assert_eq!(flat.get_pixel(4, 5), &Rgba([200, 100, 50, 255]));
        assert_eq!(flat.get_pixel(2, 4), &Rgba([0, 0, 0, 255]));
    }
}
