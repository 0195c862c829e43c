use egui::{Pos2, Vec2};
use image::{Rgba, RgbaImage};
use snap_editor::command::Command;
use snap_editor::config::{EditorConfig, HIGHLIGHT_WIDTH, highlight_color};
use snap_editor::element::{Annotation, Element, PLACEHOLDER_TEXT};
use snap_editor::session::{EditorSession, TEXT_INSERT_POSITION};
use snap_editor::tools::ToolMode;

fn session(width: u32, height: u32) -> EditorSession {
    let image = RgbaImage::from_pixel(width, height, Rgba([200, 200, 200, 255]));
    EditorSession::from_image(image, EditorConfig::default()).unwrap()
}

fn drag(session: &mut EditorSession, from: Pos2, to: Pos2) {
    session.pointer_down(from);
    session.pointer_move(to);
    session.pointer_up(to);
}

fn only_annotation(session: &EditorSession) -> &Annotation {
    let annotations = session.surface().annotations();
    assert_eq!(annotations.len(), 1);
    &annotations[0]
}

#[test]
fn rectangle_is_anchored_at_min_corner_in_any_direction() {
    for (from, to) in [
        (Pos2::new(10.0, 10.0), Pos2::new(50.0, 30.0)),
        (Pos2::new(50.0, 30.0), Pos2::new(10.0, 10.0)),
    ] {
        let mut session = session(100, 100);
        session.execute(Command::SetTool(ToolMode::Rectangle)).unwrap();
        drag(&mut session, from, to);

        let Annotation::Rectangle(rect) = only_annotation(&session) else {
            panic!("expected a rectangle");
        };
        assert_eq!(
            (rect.left(), rect.top(), rect.width(), rect.height()),
            (10.0, 10.0, 40.0, 20.0)
        );
    }
}

#[test]
fn ellipse_is_centered_on_drag_start() {
    let mut session = session(200, 200);
    session.execute(Command::SetTool(ToolMode::Ellipse)).unwrap();
    drag(&mut session, Pos2::new(100.0, 100.0), Pos2::new(120.0, 140.0));

    let Annotation::Ellipse(ellipse) = only_annotation(&session) else {
        panic!("expected an ellipse");
    };
    assert_eq!(ellipse.center(), Pos2::new(100.0, 100.0));
    assert_eq!((ellipse.rx(), ellipse.ry()), (10.0, 20.0));
}

#[test]
fn click_without_drag_commits_minimal_shape() {
    let mut session = session(100, 100);
    session.execute(Command::SetTool(ToolMode::Rectangle)).unwrap();
    session.pointer_down(Pos2::new(20.0, 20.0));
    session.pointer_up(Pos2::new(20.0, 20.0));

    let Annotation::Rectangle(rect) = only_annotation(&session) else {
        panic!("expected a rectangle");
    };
    assert_eq!((rect.width(), rect.height()), (1.0, 1.0));
}

#[test]
fn arrow_head_points_along_drag() {
    let mut session = session(100, 100);
    session.execute(Command::SetTool(ToolMode::Arrow)).unwrap();
    drag(&mut session, Pos2::new(10.0, 50.0), Pos2::new(60.0, 50.0));

    let Annotation::Arrow(arrow) = only_annotation(&session) else {
        panic!("expected an arrow");
    };
    let head = arrow.head().expect("arrow head");
    let [apex, ..] = head.points();
    assert_eq!(head.size, session.config().brush_width * 3.0);
    assert!(apex.x > arrow.end().x);
    assert!((apex.y - 50.0).abs() < 1e-4);
}

#[test]
fn freehand_and_highlight_strokes_follow_pointer() {
    let mut session = session(100, 100);
    session.execute(Command::SetTool(ToolMode::Draw)).unwrap();
    session.pointer_down(Pos2::new(1.0, 1.0));
    session.pointer_move(Pos2::new(2.0, 3.0));
    session.pointer_move(Pos2::new(5.0, 8.0));
    session.pointer_up(Pos2::new(5.0, 8.0));

    session.execute(Command::SetTool(ToolMode::Highlight)).unwrap();
    drag(&mut session, Pos2::new(20.0, 20.0), Pos2::new(40.0, 20.0));

    let annotations = session.surface().annotations();
    let (Annotation::Stroke(draw), Annotation::Stroke(highlight)) =
        (&annotations[0], &annotations[1])
    else {
        panic!("expected two strokes");
    };
    assert_eq!(draw.points().len(), 3);
    assert_eq!(draw.pen().color, session.config().brush_color);
    assert_eq!(highlight.pen().color, highlight_color());
    assert_eq!(highlight.pen().width, HIGHLIGHT_WIDTH);
}

#[test]
fn every_commit_adds_one_checkpoint() {
    let mut session = session(100, 100);
    session.execute(Command::SetTool(ToolMode::Line)).unwrap();
    drag(&mut session, Pos2::new(0.0, 0.0), Pos2::new(10.0, 10.0));
    drag(&mut session, Pos2::new(20.0, 0.0), Pos2::new(30.0, 10.0));

    assert_eq!(session.history().len(), 3);
    assert!(session.undo().unwrap());
    assert_eq!(session.surface().annotations().len(), 1);
    assert!(session.redo().unwrap());
    assert_eq!(session.surface().annotations().len(), 2);
}

#[test]
fn pointer_events_without_gesture_are_ignored() {
    let mut session = session(50, 50);
    session.pointer_move(Pos2::new(10.0, 10.0));
    session.pointer_up(Pos2::new(10.0, 10.0));

    assert!(session.surface().annotations().is_empty());
    assert_eq!(session.history().len(), 1);
}

#[test]
fn select_and_move_annotation() {
    let mut session = session(100, 100);
    session.execute(Command::SetTool(ToolMode::Rectangle)).unwrap();
    drag(&mut session, Pos2::new(10.0, 10.0), Pos2::new(30.0, 30.0));
    let id = only_annotation(&session).id();

    session.execute(Command::SetTool(ToolMode::Select)).unwrap();
    drag(&mut session, Pos2::new(20.0, 20.0), Pos2::new(35.0, 25.0));

    assert_eq!(session.selection(), Some(id));
    let rect = only_annotation(&session).rect();
    assert_eq!(rect.min, Pos2::new(25.0, 15.0));
    assert_eq!(session.history().len(), 3);

    // Clicking empty space deselects without a checkpoint
    drag(&mut session, Pos2::new(90.0, 90.0), Pos2::new(90.0, 90.0));
    assert_eq!(session.selection(), None);
    assert_eq!(session.history().len(), 3);
}

#[test]
fn delete_selection_and_clear_checkpoint() {
    let mut session = session(100, 100);
    session.execute(Command::SetTool(ToolMode::Rectangle)).unwrap();
    drag(&mut session, Pos2::new(10.0, 10.0), Pos2::new(30.0, 30.0));
    drag(&mut session, Pos2::new(50.0, 50.0), Pos2::new(70.0, 70.0));

    session.execute(Command::SetTool(ToolMode::Select)).unwrap();
    session.pointer_down(Pos2::new(60.0, 60.0));
    session.pointer_up(Pos2::new(60.0, 60.0));
    session.execute(Command::DeleteSelection).unwrap();
    assert_eq!(session.surface().annotations().len(), 1);
    assert_eq!(session.history().len(), 4);

    let background = session.surface().background_id();
    session.execute(Command::Clear).unwrap();
    assert!(session.surface().annotations().is_empty());
    assert_eq!(session.surface().background_id(), background);
    assert_eq!(session.history().len(), 5);
}

#[test]
fn text_insertion_and_editing() {
    let mut session = session(200, 200);
    session.execute(Command::SetTool(ToolMode::Rectangle)).unwrap();
    session.execute(Command::InsertText).unwrap();

    assert_eq!(session.mode(), ToolMode::Select);
    assert!(session.is_editing_text());
    let text = only_annotation(&session).as_text().expect("text label");
    assert_eq!(text.content(), PLACEHOLDER_TEXT);
    assert_eq!(text.position(), TEXT_INSERT_POSITION);
    assert_eq!(text.size(), 24.0);
    assert_eq!(session.history().len(), 1);

    session.type_text("Hi");
    session.type_text("!");
    session.backspace_text();
    session.type_text("?");
    let text = only_annotation(&session).as_text().expect("text label");
    assert_eq!(text.content(), "Hi?");

    session.finish_text_editing();
    assert!(!session.is_editing_text());
    assert_eq!(session.history().len(), 2);

    // Undo goes back to the surface before the label was inserted
    session.undo().unwrap();
    assert!(session.surface().annotations().is_empty());
}

#[test]
fn toggle_crop_uses_default_selection_then_applies() {
    let mut session = session(40, 30);
    session.execute(Command::ToggleCrop).unwrap();

    assert_eq!(session.mode(), ToolMode::Crop);
    let selection = session.crop_selection().expect("default crop selection");
    assert_eq!(selection.min, Pos2::new(4.0, 3.0));
    assert_eq!(selection.size(), Vec2::new(32.0, 24.0));

    session.execute(Command::ToggleCrop).unwrap();
    assert_eq!((session.surface().width(), session.surface().height()), (32, 24));
    assert_eq!(session.mode(), ToolMode::Select);
    assert_eq!(session.crop_selection(), None);
    assert_eq!(session.history().len(), 2);
}

#[test]
fn crop_drag_only_updates_selection() {
    let mut session = session(100, 100);
    session.execute(Command::SetTool(ToolMode::Crop)).unwrap();
    drag(&mut session, Pos2::new(60.0, 70.0), Pos2::new(20.0, 10.0));

    let selection = session.crop_selection().expect("crop selection");
    assert_eq!(selection.min, Pos2::new(20.0, 10.0));
    assert_eq!(selection.size(), Vec2::new(40.0, 60.0));
    assert_eq!(session.surface().width(), 100);
    assert_eq!(session.history().len(), 1);

    session.execute(Command::ApplyCrop).unwrap();
    assert_eq!((session.surface().width(), session.surface().height()), (40, 60));
}

#[test]
fn leaving_crop_mode_cancels_selection() {
    let mut session = session(100, 100);
    session.execute(Command::ToggleCrop).unwrap();
    assert!(session.crop_selection().is_some());

    session.execute(Command::SetTool(ToolMode::Draw)).unwrap();
    assert_eq!(session.crop_selection(), None);
    assert_eq!(session.surface().width(), 100);
}

#[test]
fn blur_commits_patch_and_checkpoint() {
    let mut session = session(100, 100);
    session.execute(Command::SetTool(ToolMode::Blur)).unwrap();
    drag(&mut session, Pos2::new(10.0, 10.0), Pos2::new(30.0, 40.0));

    let Annotation::Patch(patch) = only_annotation(&session) else {
        panic!("expected a blur patch");
    };
    assert_eq!(patch.rect().size(), Vec2::new(20.0, 30.0));
    assert!(session.surface().raster(patch.raster()).is_some());
    assert_eq!(session.history().len(), 2);
}

#[test]
fn blur_outside_surface_is_ignored() {
    let mut session = session(50, 50);
    session.execute(Command::SetTool(ToolMode::Blur)).unwrap();
    drag(&mut session, Pos2::new(60.0, 60.0), Pos2::new(80.0, 80.0));

    assert!(session.surface().annotations().is_empty());
    assert_eq!(session.history().len(), 1);
}

#[test]
fn brush_settings_apply_to_new_shapes() {
    let mut session = session(100, 100);
    session
        .execute(Command::SetBrushColor(egui::Color32::BLUE))
        .unwrap();
    session.execute(Command::SetBrushWidth(0.2)).unwrap();
    assert_eq!(session.config().brush_width, 1.0);
    session.execute(Command::SetBrushWidth(8.0)).unwrap();

    session.execute(Command::SetTool(ToolMode::Line)).unwrap();
    drag(&mut session, Pos2::new(5.0, 5.0), Pos2::new(50.0, 5.0));

    let Annotation::Line(line) = only_annotation(&session) else {
        panic!("expected a line");
    };
    assert_eq!(line.pen().color, egui::Color32::BLUE);
    assert_eq!(line.pen().width, 8.0);
    // Brush changes are settings, not edits
    assert_eq!(session.history().len(), 2);
}
