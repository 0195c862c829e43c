use egui::{Color32, Pos2, Rect};
use image::RgbaImage;
use log::{debug, info, warn};

use crate::command::{Command, History};
use crate::config::EditorConfig;
use crate::element::{Annotation, Element, Text};
use crate::error::EditorResult;
use crate::rasterize;
use crate::surface::Surface;
use crate::tools::{Gesture, GestureKind, ToolMode};
use crate::transform;

/// Where a newly inserted text label is placed
pub const TEXT_INSERT_POSITION: Pos2 = Pos2::new(50.0, 50.0);

/// Fraction of the surface trimmed from each side by the default crop selection
pub const CROP_DEFAULT_INSET: f32 = 0.1;

/// One editing session over a single screenshot.
///
/// Owns the surface, the active tool, the gesture in progress and the
/// history. Pointer handlers never fail: events that make no sense in the
/// current state are ignored.
#[derive(Debug)]
pub struct EditorSession {
    surface: Surface,
    history: History,
    mode: ToolMode,
    gesture: Option<Gesture>,
    selection: Option<usize>,
    editing_text: Option<usize>,
    crop_selection: Option<Rect>,
    config: EditorConfig,
}

impl EditorSession {
    pub fn new(surface: Surface, config: EditorConfig) -> EditorResult<Self> {
        let history = History::new(&surface, config.history_limit)?;
        info!(
            "Editor session started on {}x{} surface",
            surface.width(),
            surface.height()
        );
        Ok(Self {
            surface,
            history,
            mode: ToolMode::default(),
            gesture: None,
            selection: None,
            editing_text: None,
            crop_selection: None,
            config,
        })
    }

    pub fn from_image(image: RgbaImage, config: EditorConfig) -> EditorResult<Self> {
        Self::new(Surface::from_image(image), config)
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn mode(&self) -> ToolMode {
        self.mode
    }

    pub fn gesture(&self) -> Option<&Gesture> {
        self.gesture.as_ref()
    }

    pub fn selection(&self) -> Option<usize> {
        self.selection
    }

    pub fn editing_text(&self) -> Option<usize> {
        self.editing_text
    }

    pub fn is_editing_text(&self) -> bool {
        self.editing_text.is_some()
    }

    pub fn crop_selection(&self) -> Option<Rect> {
        self.crop_selection
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Execute a non-pointer command
    pub fn execute(&mut self, command: Command) -> EditorResult<()> {
        debug!("Executing command: {}", command.label());
        match command {
            Command::SetTool(ToolMode::Text) | Command::InsertText => self.insert_text(),
            Command::SetTool(mode) => self.set_mode(mode),
            Command::ToggleCrop => return self.toggle_crop(),
            Command::ApplyCrop => return self.apply_crop(),
            Command::CancelCrop => self.cancel_crop(),
            Command::Undo => return self.undo().map(|_| ()),
            Command::Redo => return self.redo().map(|_| ()),
            Command::DeleteSelection => self.delete_selection(),
            Command::Clear => self.clear(),
            Command::SetBrushColor(color) => self.set_brush_color(color),
            Command::SetBrushWidth(width) => self.set_brush_width(width),
        }
        Ok(())
    }

    /// Switch tools. Any gesture in progress is dropped, and leaving crop
    /// mode discards the pending crop selection.
    pub fn set_mode(&mut self, mode: ToolMode) {
        if mode == self.mode {
            return;
        }
        self.finish_text_editing();
        self.gesture = None;
        if self.mode == ToolMode::Crop {
            self.crop_selection = None;
        }
        if mode != ToolMode::Select {
            self.selection = None;
        }

        info!("Tool changed: {} -> {}", self.mode, mode);
        self.mode = mode;

        if mode == ToolMode::Crop && self.crop_selection.is_none() {
            self.crop_selection = Some(self.default_crop_selection());
        }
    }

    pub fn set_brush_color(&mut self, color: Color32) {
        self.config.brush_color = color;
    }

    pub fn set_brush_width(&mut self, width: f32) {
        self.config.brush_width = width.max(1.0);
    }

    pub fn pointer_down(&mut self, pos: Pos2) {
        self.finish_text_editing();
        if self.gesture.is_some() {
            debug!("Pointer down while a gesture is in progress, ignoring");
            return;
        }

        match self.mode {
            ToolMode::Select => {
                self.selection = self.surface.topmost_at(pos);
                self.gesture = self.selection.map(|id| Gesture::begin_move(pos, id));
            }
            mode if !mode.creates_on_pointer_down() => {}
            mode => {
                let pen = if mode == ToolMode::Highlight {
                    self.config.highlighter()
                } else {
                    self.config.brush()
                };
                let id = match mode {
                    ToolMode::Blur | ToolMode::Crop => 0,
                    _ => self.surface.allocate_id(),
                };
                self.gesture = Gesture::begin_shape(mode, pos, id, pen);
                debug!("Gesture started in {} mode at {:?}", mode, pos);
            }
        }
    }

    pub fn pointer_move(&mut self, pos: Pos2) {
        let Some(gesture) = &mut self.gesture else {
            return;
        };

        if let Some(delta) = gesture.update(pos) {
            if let Some(target) = gesture.target_id().and_then(|id| self.surface.find_mut(id)) {
                target.translate(delta);
            }
        }
    }

    pub fn pointer_up(&mut self, _pos: Pos2) {
        let Some(gesture) = self.gesture.take() else {
            return;
        };

        match gesture.into_kind() {
            GestureKind::Shape(shape) => {
                debug!("Committing {} #{}", shape.element_type(), shape.id());
                self.surface.add(shape);
                self.checkpoint();
            }
            GestureKind::Blur(region) => self.blur_region(region),
            GestureKind::Crop(region) => {
                if region.width() >= 1.0 && region.height() >= 1.0 {
                    self.crop_selection = Some(region);
                }
            }
            GestureKind::Move { moved, .. } => {
                if moved {
                    self.checkpoint();
                }
            }
        }
    }

    /// Blur a region and checkpoint. Regions outside the surface are ignored.
    pub fn blur_region(&mut self, region: Rect) {
        match transform::blur(&mut self.surface, region, self.config.blur_radius) {
            Ok(_) => self.checkpoint(),
            Err(err) => warn!("Blur ignored: {err}"),
        }
    }

    /// Crop the surface to the given region and checkpoint
    pub fn crop_to(&mut self, region: Rect) -> EditorResult<()> {
        transform::crop(&mut self.surface, region)?;
        self.selection = None;
        self.editing_text = None;
        self.crop_selection = None;
        self.checkpoint();
        if self.mode == ToolMode::Crop {
            self.mode = ToolMode::Select;
        }
        Ok(())
    }

    fn default_crop_selection(&self) -> Rect {
        let size = self.surface.size();
        Rect::from_min_size(
            (size * CROP_DEFAULT_INSET).to_pos2(),
            size * (1.0 - 2.0 * CROP_DEFAULT_INSET),
        )
    }

    pub fn start_crop(&mut self) {
        self.set_mode(ToolMode::Crop);
        if self.crop_selection.is_none() {
            self.crop_selection = Some(self.default_crop_selection());
        }
    }

    pub fn toggle_crop(&mut self) -> EditorResult<()> {
        if self.mode == ToolMode::Crop && self.crop_selection.is_some() {
            self.apply_crop()
        } else {
            self.start_crop();
            Ok(())
        }
    }

    pub fn apply_crop(&mut self) -> EditorResult<()> {
        let Some(selection) = self.crop_selection else {
            return Ok(());
        };
        self.crop_to(selection)
    }

    pub fn cancel_crop(&mut self) {
        self.crop_selection = None;
        if self.mode == ToolMode::Crop {
            self.set_mode(ToolMode::Select);
        }
    }

    /// Add a placeholder label, select it, start editing and switch to select mode
    pub fn insert_text(&mut self) {
        self.set_mode(ToolMode::Select);
        let id = self.surface.allocate_id();
        self.surface.add(Annotation::Text(Text::placeholder(
            id,
            TEXT_INSERT_POSITION,
            self.config.brush_color,
            self.config.text_size,
        )));
        self.selection = Some(id);
        self.editing_text = Some(id);
        info!("Inserted text #{id}");
    }

    fn edited_text(&mut self) -> Option<&mut Text> {
        let id = self.editing_text?;
        self.surface.find_mut(id).and_then(Annotation::as_text_mut)
    }

    pub fn type_text(&mut self, input: &str) {
        if let Some(text) = self.edited_text() {
            text.push_str(input);
        }
    }

    pub fn backspace_text(&mut self) {
        if let Some(text) = self.edited_text() {
            text.backspace();
        }
    }

    /// Leave text editing; checkpoints if a label was being edited
    pub fn finish_text_editing(&mut self) {
        if self.editing_text.take().is_some() {
            self.checkpoint();
        }
    }

    pub fn delete_selection(&mut self) {
        let Some(id) = self.selection.take() else {
            return;
        };
        if self.editing_text == Some(id) {
            self.editing_text = None;
        }
        if self.surface.remove(id).is_some() {
            info!("Deleted annotation #{id}");
            self.checkpoint();
        }
    }

    /// Remove every annotation, keeping the current background
    pub fn clear(&mut self) {
        self.gesture = None;
        self.selection = None;
        self.editing_text = None;
        self.surface.clear_annotations();
        self.checkpoint();
    }

    pub fn undo(&mut self) -> EditorResult<bool> {
        self.finish_text_editing();
        let changed = self.history.undo(&mut self.surface)?;
        if changed {
            self.after_restore();
        }
        Ok(changed)
    }

    pub fn redo(&mut self) -> EditorResult<bool> {
        self.finish_text_editing();
        let changed = self.history.redo(&mut self.surface)?;
        if changed {
            self.after_restore();
        }
        Ok(changed)
    }

    fn after_restore(&mut self) {
        self.gesture = None;
        if self
            .selection
            .is_some_and(|id| self.surface.find(id).is_none())
        {
            self.selection = None;
        }
        if self.mode == ToolMode::Crop {
            self.crop_selection = Some(self.default_crop_selection());
        }
    }

    /// Record the surface in the history; failures are logged, never fatal
    fn checkpoint(&mut self) {
        if let Err(err) = self.history.checkpoint(&self.surface) {
            warn!("Failed to record history checkpoint: {err}");
        }
    }

    /// Background and annotations rendered into one image
    pub fn flatten(&self) -> EditorResult<RgbaImage> {
        rasterize::flatten(&self.surface)
    }
}
