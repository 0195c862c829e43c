use egui::{Context, Event, Key, Modifiers, PointerButton, Pos2, RawInput, Rect, Vec2};
use image::RgbaImage;
use snap_editor::config::EditorConfig;
use snap_editor::element::{Annotation, PLACEHOLDER_TEXT};
use snap_editor::input::{self, ExportRequest, InputEvent, InputHandler};
use snap_editor::renderer::CanvasTransform;
use snap_editor::session::EditorSession;

const CANVAS: Rect = Rect::from_min_max(Pos2::ZERO, Pos2::new(100.0, 100.0));

fn session() -> EditorSession {
    EditorSession::from_image(RgbaImage::new(100, 100), EditorConfig::default()).unwrap()
}

fn key_press(key: Key, modifiers: Modifiers) -> Event {
    Event::Key {
        key,
        physical_key: None,
        pressed: true,
        repeat: false,
        modifiers,
    }
}

/// Run one egui frame and collect what the handler makes of its input
fn run_frame(
    ctx: &Context,
    handler: &mut InputHandler,
    modifiers: Modifiers,
    events: Vec<Event>,
) -> Vec<InputEvent> {
    let raw = RawInput {
        screen_rect: Some(CANVAS),
        modifiers,
        events,
        ..Default::default()
    };
    let transform = CanvasTransform {
        origin: Pos2::ZERO,
        scale: 1.0,
    };
    let mut collected = Vec::new();
    let _ = ctx.run(raw, |ctx| {
        collected = handler.process_input(ctx, CANVAS, transform);
    });
    collected
}

fn label_content(session: &EditorSession) -> String {
    session
        .surface()
        .annotations()
        .iter()
        .find_map(Annotation::as_text)
        .map(|text| text.content().to_owned())
        .unwrap_or_default()
}

#[test]
fn letter_press_yields_key_then_text() {
    let ctx = Context::default();
    let mut handler = InputHandler::new();
    let events = run_frame(
        &ctx,
        &mut handler,
        Modifiers::NONE,
        vec![key_press(Key::T, Modifiers::NONE), Event::Text("t".into())],
    );

    assert_eq!(
        events,
        vec![
            InputEvent::KeyDown {
                key: Key::T,
                modifiers: Modifiers::NONE
            },
            InputEvent::Text("t".into()),
        ]
    );
}

#[test]
fn pressing_t_keeps_placeholder_until_next_keystroke() {
    let ctx = Context::default();
    let mut handler = InputHandler::new();
    let mut session = session();

    let events = run_frame(
        &ctx,
        &mut handler,
        Modifiers::NONE,
        vec![key_press(Key::T, Modifiers::NONE), Event::Text("t".into())],
    );
    input::dispatch_frame(&mut session, events);
    assert!(session.is_editing_text());
    assert_eq!(label_content(&session), PLACEHOLDER_TEXT);

    let events = run_frame(
        &ctx,
        &mut handler,
        Modifiers::NONE,
        vec![key_press(Key::O, Modifiers::NONE), Event::Text("o".into())],
    );
    input::dispatch_frame(&mut session, events);
    assert_eq!(label_content(&session), "o");
}

#[test]
fn typed_t_while_editing_is_kept() {
    let mut session = session();
    input::dispatch_frame(
        &mut session,
        vec![
            InputEvent::KeyDown {
                key: Key::T,
                modifiers: Modifiers::NONE,
            },
            InputEvent::Text("t".into()),
        ],
    );

    input::dispatch_frame(
        &mut session,
        vec![
            InputEvent::KeyDown {
                key: Key::T,
                modifiers: Modifiers::NONE,
            },
            InputEvent::Text("t".into()),
        ],
    );
    assert_eq!(label_content(&session), "t");
    assert_eq!(session.surface().annotations().len(), 1);
}

#[test]
fn copy_event_becomes_copy_request() {
    let ctx = Context::default();
    let mut handler = InputHandler::new();
    let events = run_frame(&ctx, &mut handler, Modifiers::COMMAND, vec![Event::Copy]);

    assert_eq!(
        events,
        vec![InputEvent::KeyDown {
            key: Key::C,
            modifiers: Modifiers::COMMAND
        }]
    );
    let mut session = session();
    assert_eq!(
        input::dispatch_frame(&mut session, events),
        vec![ExportRequest::Copy]
    );
}

#[test]
fn ctrl_z_undoes_drawn_line() {
    let ctx = Context::default();
    let mut handler = InputHandler::new();
    let mut session = session();

    let press = |pressed| Event::PointerButton {
        pos: Pos2::new(10.0, 10.0),
        button: PointerButton::Primary,
        pressed,
        modifiers: Modifiers::NONE,
    };
    let frames = [
        vec![key_press(Key::L, Modifiers::NONE), Event::Text("l".into())],
        vec![Event::PointerMoved(Pos2::new(10.0, 10.0)), press(true)],
        vec![Event::PointerMoved(Pos2::new(40.0, 30.0))],
        vec![Event::PointerButton {
            pos: Pos2::new(40.0, 30.0),
            button: PointerButton::Primary,
            pressed: false,
            modifiers: Modifiers::NONE,
        }],
    ];
    for events in frames {
        let events = run_frame(&ctx, &mut handler, Modifiers::NONE, events);
        input::dispatch_frame(&mut session, events);
    }
    assert_eq!(session.surface().annotations().len(), 1);
    let Annotation::Line(line) = &session.surface().annotations()[0] else {
        panic!("expected a line");
    };
    assert_eq!(line.end() - line.start(), Vec2::new(30.0, 20.0));

    let events = run_frame(
        &ctx,
        &mut handler,
        Modifiers::COMMAND,
        vec![key_press(Key::Z, Modifiers::COMMAND)],
    );
    input::dispatch_frame(&mut session, events);
    assert!(session.surface().annotations().is_empty());
}
