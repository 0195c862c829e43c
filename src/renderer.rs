use std::collections::HashMap;

use egui::{
    Align2, Color32, ColorImage, Context, FontId, Painter, Pos2, Rect, Shape, Stroke as EguiStroke,
    TextureHandle, TextureId, TextureOptions, Vec2,
};
use image::RgbaImage;

use crate::element::{Annotation, Element, Pen};
use crate::raster::RasterId;
use crate::session::EditorSession;
use crate::surface::Surface;
use crate::tools::GestureKind;

const ELLIPSE_SEGMENTS: usize = 64;
const SELECTION_COLOR: Color32 = Color32::from_rgb(100, 100, 255);
const BLUR_PREVIEW_FILL: Color32 = Color32::from_black_alpha(204);
const CROP_DIM_FILL: Color32 = Color32::from_black_alpha(77);
const CROP_BORDER: EguiStroke = EguiStroke {
    width: 1.0,
    color: Color32::WHITE,
};

/// Maps between surface pixels and screen points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasTransform {
    pub origin: Pos2,
    pub scale: f32,
}

impl CanvasTransform {
    /// Fit the surface into `available`, never enlarging it, centered
    pub fn fit(available: Rect, surface_size: Vec2) -> Self {
        let scale = if surface_size.x > 0.0 && surface_size.y > 0.0 {
            (available.width() / surface_size.x)
                .min(available.height() / surface_size.y)
                .min(1.0)
        } else {
            1.0
        };
        let scaled = surface_size * scale;
        let origin = available.center() - scaled / 2.0;
        Self { origin, scale }
    }

    pub fn to_screen(&self, pos: Pos2) -> Pos2 {
        self.origin + pos.to_vec2() * self.scale
    }

    pub fn to_surface(&self, pos: Pos2) -> Pos2 {
        ((pos - self.origin) / self.scale).to_pos2()
    }

    pub fn rect_to_screen(&self, rect: Rect) -> Rect {
        Rect::from_min_max(self.to_screen(rect.min), self.to_screen(rect.max))
    }

    fn stroke(&self, pen: Pen) -> EguiStroke {
        EguiStroke::new(pen.width * self.scale, pen.color)
    }
}

/// Paints an editor session with an egui painter.
///
/// Raster buffers are uploaded once per [`RasterId`] and reused until the
/// surface stops referring to them.
#[derive(Default)]
pub struct Renderer {
    textures: HashMap<RasterId, TextureHandle>,
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("textures", &self.textures.len())
            .finish()
    }
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Renders the session into the painter's clip rect
    pub fn render(
        &mut self,
        ctx: &Context,
        painter: &Painter,
        session: &EditorSession,
        transform: CanvasTransform,
    ) {
        let surface = session.surface();
        self.prune(surface);

        let canvas = transform.rect_to_screen(surface.bounds());
        painter.rect_filled(canvas, 0.0, Color32::WHITE);

        if let Some(id) = surface.background_id() {
            if let Some(texture) = self.texture(ctx, surface, id) {
                painter.image(texture, canvas, full_uv(), Color32::WHITE);
            }
        }

        for annotation in surface.annotations() {
            let patch_texture = match annotation {
                Annotation::Patch(patch) => self.texture(ctx, surface, patch.raster()),
                _ => None,
            };
            paint_annotation(painter, transform, annotation, patch_texture);
        }

        if let Some(gesture) = session.gesture() {
            match gesture.kind() {
                GestureKind::Shape(shape) => paint_annotation(painter, transform, shape, None),
                GestureKind::Blur(region) => {
                    painter.rect_filled(transform.rect_to_screen(*region), 0.0, BLUR_PREVIEW_FILL);
                }
                GestureKind::Crop(region) => paint_crop_overlay(painter, transform, canvas, *region),
                GestureKind::Move { .. } => {}
            }
        }

        let crop_in_progress = matches!(
            session.gesture().map(|g| g.kind()),
            Some(GestureKind::Crop(_))
        );
        if let (Some(region), false) = (session.crop_selection(), crop_in_progress) {
            paint_crop_overlay(painter, transform, canvas, region);
        }

        if let Some(selected) = session.selection().and_then(|id| surface.find(id)) {
            painter.rect_stroke(
                transform.rect_to_screen(selected.rect()).expand(2.0),
                0.0,
                EguiStroke::new(1.0, SELECTION_COLOR),
            );
        }

        // Caret after the label being typed into
        if let Some(text) = session
            .editing_text()
            .and_then(|id| surface.find(id))
            .and_then(Annotation::as_text)
        {
            let rect = transform.rect_to_screen(text.rect());
            painter.line_segment(
                [rect.right_top(), rect.right_bottom()],
                EguiStroke::new(1.5, text.color()),
            );
        }
    }

    fn texture(&mut self, ctx: &Context, surface: &Surface, id: RasterId) -> Option<TextureId> {
        if let Some(handle) = self.textures.get(&id) {
            return Some(handle.id());
        }
        let raster = surface.raster(id)?;
        let handle = ctx.load_texture(
            format!("raster_{id}"),
            to_color_image(raster),
            TextureOptions::LINEAR,
        );
        let texture_id = handle.id();
        self.textures.insert(id, handle);
        Some(texture_id)
    }

    /// Free textures of rasters the surface no longer holds
    pub fn prune(&mut self, surface: &Surface) {
        self.textures.retain(|id, _| surface.rasters().contains(*id));
    }
}

fn full_uv() -> Rect {
    Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0))
}

fn to_color_image(image: &RgbaImage) -> ColorImage {
    ColorImage::from_rgba_unmultiplied(
        [image.width() as usize, image.height() as usize],
        image.as_raw(),
    )
}

fn paint_annotation(
    painter: &Painter,
    transform: CanvasTransform,
    annotation: &Annotation,
    texture: Option<TextureId>,
) {
    match annotation {
        Annotation::Rectangle(rect) => {
            painter.rect_stroke(
                transform.rect_to_screen(rect.rect()),
                0.0,
                transform.stroke(rect.pen()),
            );
        }
        Annotation::Ellipse(ellipse) => {
            let points = ellipse
                .outline(ELLIPSE_SEGMENTS)
                .into_iter()
                .map(|p| transform.to_screen(p))
                .collect();
            painter.add(Shape::closed_line(points, transform.stroke(ellipse.pen())));
        }
        Annotation::Line(line) => {
            painter.line_segment(
                [transform.to_screen(line.start()), transform.to_screen(line.end())],
                transform.stroke(line.pen()),
            );
        }
        Annotation::Arrow(arrow) => {
            painter.line_segment(
                [transform.to_screen(arrow.start()), transform.to_screen(arrow.end())],
                transform.stroke(arrow.pen()),
            );
            if let Some(head) = arrow.head() {
                let points = head.points().map(|p| transform.to_screen(p)).to_vec();
                painter.add(Shape::convex_polygon(
                    points,
                    arrow.pen().color,
                    EguiStroke::NONE,
                ));
            }
        }
        Annotation::Stroke(stroke) => {
            let points: Vec<Pos2> = stroke.points().iter().map(|p| transform.to_screen(*p)).collect();
            match points.as_slice() {
                [] => {}
                [dot] => {
                    painter.circle_filled(
                        *dot,
                        stroke.pen().width * transform.scale / 2.0,
                        stroke.pen().color,
                    );
                }
                _ => {
                    painter.add(Shape::line(points, transform.stroke(stroke.pen())));
                }
            }
        }
        Annotation::Text(text) => {
            painter.text(
                transform.to_screen(text.position()),
                Align2::LEFT_TOP,
                text.content(),
                FontId::proportional(text.size() * transform.scale),
                text.color(),
            );
        }
        Annotation::Patch(patch) => {
            if let Some(texture) = texture {
                painter.image(
                    texture,
                    transform.rect_to_screen(patch.rect()),
                    full_uv(),
                    Color32::WHITE,
                );
            }
        }
    }
}

/// Dim everything outside the crop region and outline it
fn paint_crop_overlay(painter: &Painter, transform: CanvasTransform, canvas: Rect, region: Rect) {
    let inner = transform.rect_to_screen(region).intersect(canvas);
    let bands = [
        Rect::from_min_max(canvas.min, Pos2::new(canvas.max.x, inner.min.y)),
        Rect::from_min_max(Pos2::new(canvas.min.x, inner.max.y), canvas.max),
        Rect::from_min_max(
            Pos2::new(canvas.min.x, inner.min.y),
            Pos2::new(inner.min.x, inner.max.y),
        ),
        Rect::from_min_max(
            Pos2::new(inner.max.x, inner.min.y),
            Pos2::new(canvas.max.x, inner.max.y),
        ),
    ];
    for band in bands.into_iter().filter(|b| b.is_positive()) {
        painter.rect_filled(band, 0.0, CROP_DIM_FILL);
    }
    painter.rect_stroke(inner, 0.0, CROP_BORDER);
}
