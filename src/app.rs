use std::path::PathBuf;

use egui::Pos2;
use image::RgbaImage;

use crate::command::Command;
use crate::config::EditorConfig;
use crate::error::{EditorError, EditorResult};
use crate::export;
use crate::input::{self, ExportRequest, InputHandler};
use crate::panels::{central_panel, tools_panel};
use crate::renderer::Renderer;
use crate::session::EditorSession;

/// The eframe application wrapping one editor session.
///
/// Only the [`EditorConfig`] is persisted on shutdown; the surface and its
/// history live for the session only.
pub struct EditorApp {
    session: EditorSession,
    renderer: Renderer,
    input: InputHandler,
    // Raw message of the last failed export, shown in a modal
    error: Option<String>,
    show_clear_modal: bool,
    share_link: Option<String>,
    // Pointer position over the canvas, in surface pixels
    cursor: Option<Pos2>,
}

impl EditorApp {
    /// Called once before the first frame.
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        screenshot: RgbaImage,
        export_dir: Option<PathBuf>,
        upload_endpoint: Option<String>,
    ) -> EditorResult<Self> {
        let mut config: EditorConfig = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, eframe::APP_KEY))
            .unwrap_or_default();
        if export_dir.is_some() {
            config.export_dir = export_dir;
        }
        if upload_endpoint.is_some() {
            config.upload_endpoint = upload_endpoint;
        }

        Ok(Self {
            session: EditorSession::from_image(screenshot, config)?,
            renderer: Renderer::new(),
            input: InputHandler::new(),
            error: None,
            show_clear_modal: false,
            share_link: None,
            cursor: None,
        })
    }

    pub fn session(&self) -> &EditorSession {
        &self.session
    }

    pub fn cursor(&self) -> Option<Pos2> {
        self.cursor
    }

    pub(crate) fn set_cursor(&mut self, cursor: Option<Pos2>) {
        self.cursor = cursor;
    }

    /// Link of the last successful share, already on the clipboard
    pub fn share_link(&self) -> Option<&str> {
        self.share_link.as_deref()
    }

    pub(crate) fn parts_mut(&mut self) -> (&mut EditorSession, &mut Renderer, &mut InputHandler) {
        (&mut self.session, &mut self.renderer, &mut self.input)
    }

    pub fn execute(&mut self, command: Command) {
        let label = command.label();
        if let Err(err) = self.session.execute(command) {
            log::warn!("{label} failed: {err}");
        }
    }

    /// Feed a batch of canvas events into the session
    pub fn handle_events(&mut self, events: Vec<input::InputEvent>) {
        for request in input::dispatch_frame(&mut self.session, events) {
            self.export(request);
        }
    }

    pub fn export(&mut self, request: ExportRequest) {
        let result = self.session.flatten().and_then(|image| match request {
            ExportRequest::Save => {
                let dir = self
                    .session
                    .config()
                    .export_dir
                    .clone()
                    .unwrap_or_else(|| PathBuf::from("."));
                export::save_png(&image, &dir).map(|_| ())
            }
            ExportRequest::Copy => export::copy_to_clipboard(&image),
            ExportRequest::Share => {
                let endpoint = self.session.config().upload_endpoint.as_deref().ok_or_else(|| {
                    EditorError::Share("no upload endpoint configured".to_owned())
                })?;
                self.share_link = Some(export::share_png(&image, endpoint)?);
                Ok(())
            }
        });
        if let Err(err) = result {
            log::error!("Export failed: {err}");
            self.error = Some(err.to_string());
        }
    }

    pub fn request_clear(&mut self) {
        self.show_clear_modal = true;
    }

    fn show_modals(&mut self, ctx: &egui::Context) {
        if let Some(message) = &self.error {
            let mut close = false;
            egui::Window::new("Export failed")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.label(message);
                    if ui.button("Close").clicked() {
                        close = true;
                    }
                });
            if close {
                self.error = None;
            }
        }

        if self.show_clear_modal {
            egui::Window::new("Clear annotations?")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.label("Remove every annotation from the screenshot?");
                    ui.horizontal(|ui| {
                        if ui.button("Clear").clicked() {
                            self.session.clear();
                            self.show_clear_modal = false;
                        }
                        if ui.button("Cancel").clicked() {
                            self.show_clear_modal = false;
                        }
                    });
                });
        }
    }
}

impl eframe::App for EditorApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, self.session.config());
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        tools_panel(self, ctx);
        central_panel(self, ctx);
        self.show_modals(ctx);
    }
}
