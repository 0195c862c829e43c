use crate::app::EditorApp;
use crate::renderer::CanvasTransform;

pub fn central_panel(app: &mut EditorApp, ctx: &egui::Context) {
    egui::CentralPanel::default()
        .frame(egui::Frame::canvas(&ctx.style()))
        .show(ctx, |ui| {
            let (response, painter) =
                ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
            let size = app.session().surface().size();
            let transform = CanvasTransform::fit(response.rect, size);
            let canvas_rect = transform.rect_to_screen(app.session().surface().bounds());
            let cursor = response
                .hover_pos()
                .filter(|pos| canvas_rect.contains(*pos))
                .map(|pos| transform.to_surface(pos));
            app.set_cursor(cursor);

            let events = {
                let (_, _, input) = app.parts_mut();
                input.process_input(ctx, canvas_rect, transform)
            };
            if !events.is_empty() {
                app.handle_events(events);
                ctx.request_repaint();
            }

            let (session, renderer, _) = app.parts_mut();
            renderer.render(ctx, &painter, session, transform);
        });
}
