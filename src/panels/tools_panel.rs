use egui;

use crate::app::EditorApp;
use crate::command::Command;
use crate::components::ToolButton;
use crate::input::ExportRequest;
use crate::tools::ToolMode;

pub fn tools_panel(app: &mut EditorApp, ctx: &egui::Context) {
    egui::SidePanel::left("tools_panel")
        .resizable(true)
        .default_width(200.0)
        .show(ctx, |ui| {
            ui.heading("Tools");

            let active = app.session().mode();
            ui.horizontal_wrapped(|ui| {
                for mode in ToolMode::ALL {
                    if ToolButton::new(mode, active == mode).show(ui).clicked() {
                        log::info!("Tool selected from UI: {}", mode);
                        let command = match mode {
                            ToolMode::Text => Command::InsertText,
                            mode => Command::SetTool(mode),
                        };
                        app.execute(command);
                    }
                }
            });

            if app.session().crop_selection().is_some() {
                ui.horizontal(|ui| {
                    if ui.button("Apply crop").clicked() {
                        app.execute(Command::ApplyCrop);
                    }
                    if ui.button("Cancel").clicked() {
                        app.execute(Command::CancelCrop);
                    }
                });
            }
            ui.separator();

            ui.heading("Brush");
            let mut color = app.session().config().brush_color;
            ui.horizontal(|ui| {
                ui.label("Color");
                if ui.color_edit_button_srgba(&mut color).changed() {
                    app.execute(Command::SetBrushColor(color));
                }
            });
            let mut width = app.session().config().brush_width;
            if ui
                .add(egui::Slider::new(&mut width, 1.0..=30.0).text("Width"))
                .changed()
            {
                app.execute(Command::SetBrushWidth(width));
            }
            ui.separator();

            // Undo/Redo section
            let history = app.session().history();
            let (can_undo, can_redo) = (history.can_undo(), history.can_redo());
            let (position, len, limit) = (history.cursor() + 1, history.len(), history.limit());
            ui.horizontal(|ui| {
                if ui.add_enabled(can_undo, egui::Button::new("Undo")).clicked() {
                    app.execute(Command::Undo);
                }
                if ui.add_enabled(can_redo, egui::Button::new("Redo")).clicked() {
                    app.execute(Command::Redo);
                }
            });
            ui.label(format!("History: {position} / {len} (max {limit})"));

            let has_selection = app.session().selection().is_some();
            ui.horizontal(|ui| {
                if ui
                    .add_enabled(has_selection, egui::Button::new("Delete"))
                    .clicked()
                {
                    app.execute(Command::DeleteSelection);
                }
                if ui.button("Clear").clicked() {
                    app.request_clear();
                }
            });
            ui.separator();

            ui.heading("Export");
            ui.horizontal(|ui| {
                if ui.button("Save").clicked() {
                    app.export(ExportRequest::Save);
                }
                if ui.button("Copy").clicked() {
                    app.export(ExportRequest::Copy);
                }
                let can_share = app.session().config().upload_endpoint.is_some();
                if ui
                    .add_enabled(can_share, egui::Button::new("Share"))
                    .on_disabled_hover_text("Start with --upload-endpoint to enable sharing")
                    .clicked()
                {
                    app.export(ExportRequest::Share);
                }
            });
            if let Some(link) = app.share_link() {
                ui.hyperlink(link);
            }
            let surface = app.session().surface();
            ui.label(format!(
                "{} x {} px, {} annotations",
                surface.width(),
                surface.height(),
                surface.annotations().len()
            ));
            if let Some(cursor) = app.cursor() {
                ui.label(format!("Cursor: {}, {}", cursor.x.round(), cursor.y.round()));
            }
        });
}
