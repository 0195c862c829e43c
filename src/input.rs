use egui::{Context, Key, Modifiers, PointerButton, Pos2, Rect};

use crate::command::Command;
use crate::error::EditorResult;
use crate::renderer::CanvasTransform;
use crate::session::EditorSession;
use crate::tools::ToolMode;

/// Input events in surface coordinates
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Primary button was pressed over the canvas
    PointerDown { position: Pos2 },
    /// Pointer moved
    PointerMove { position: Pos2 },
    /// Primary button was released
    PointerUp { position: Pos2 },
    /// Key was pressed
    KeyDown { key: Key, modifiers: Modifiers },
    /// Text typed by the user
    Text(String),
}

/// Requests the session cannot fulfil on its own
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportRequest {
    Save,
    Copy,
    /// Upload and copy the share link
    Share,
}

/// What a keyboard shortcut resolves to
#[derive(Debug, Clone, PartialEq)]
pub enum KeyAction {
    Command(Command),
    Export(ExportRequest),
}

fn letter(key: Key) -> Option<char> {
    let c = match key {
        Key::A => 'a',
        Key::B => 'b',
        Key::C => 'c',
        Key::D => 'd',
        Key::H => 'h',
        Key::L => 'l',
        Key::R => 'r',
        Key::S => 's',
        Key::T => 't',
        Key::V => 'v',
        Key::X => 'x',
        Key::Y => 'y',
        Key::Z => 'z',
        _ => return None,
    };
    Some(c)
}

/// Map a key press to an editor action.
///
/// Ctrl (Cmd on macOS) combinations never fall through to the plain
/// single-letter tool shortcuts.
pub fn map_shortcut(key: Key, modifiers: Modifiers) -> Option<KeyAction> {
    if modifiers.command || modifiers.ctrl {
        return match letter(key)? {
            'z' => Some(KeyAction::Command(Command::Undo)),
            'y' => Some(KeyAction::Command(Command::Redo)),
            's' => Some(KeyAction::Export(ExportRequest::Save)),
            'c' => Some(KeyAction::Export(ExportRequest::Copy)),
            _ => None,
        };
    }

    match key {
        Key::Delete => return Some(KeyAction::Command(Command::DeleteSelection)),
        Key::Enter => return Some(KeyAction::Command(Command::ApplyCrop)),
        Key::Escape => return Some(KeyAction::Command(Command::CancelCrop)),
        _ => {}
    }

    if modifiers.alt {
        return None;
    }
    let mode = ToolMode::from_shortcut(letter(key)?)?;
    let command = match mode {
        ToolMode::Text => Command::InsertText,
        ToolMode::Crop => Command::ToggleCrop,
        mode => Command::SetTool(mode),
    };
    Some(KeyAction::Command(command))
}

/// Feed one frame's events into the session, returning export requests.
///
/// egui reports a printable keypress as a key event followed by a text
/// event. When the key event starts editing a new label, the text event of
/// the same keypress is dropped so the placeholder stays until the next
/// keystroke. Failed commands are logged and skipped.
pub fn dispatch_frame(session: &mut EditorSession, events: Vec<InputEvent>) -> Vec<ExportRequest> {
    let mut requests = Vec::new();
    let mut swallow_text = false;

    for event in events {
        match &event {
            InputEvent::Text(_) if swallow_text => {
                swallow_text = false;
                continue;
            }
            InputEvent::KeyDown { .. } => swallow_text = false,
            _ => {}
        }

        let was_editing = session.is_editing_text();
        let starts_label = matches!(event, InputEvent::KeyDown { .. });
        match dispatch(session, event) {
            Ok(Some(request)) => requests.push(request),
            Ok(None) => {}
            Err(err) => log::warn!("Input ignored: {err}"),
        }
        if starts_label && !was_editing && session.is_editing_text() {
            swallow_text = true;
        }
    }

    requests
}

/// Feed one event into the session.
///
/// Returns an export request when a shortcut asks for one; the caller owns
/// the file system and clipboard.
pub fn dispatch(session: &mut EditorSession, event: InputEvent) -> EditorResult<Option<ExportRequest>> {
    match event {
        InputEvent::PointerDown { position } => session.pointer_down(position),
        InputEvent::PointerMove { position } => session.pointer_move(position),
        InputEvent::PointerUp { position } => session.pointer_up(position),
        InputEvent::Text(text) => {
            if session.is_editing_text() {
                let printable: String = text.chars().filter(|c| !c.is_control()).collect();
                if !printable.is_empty() {
                    session.type_text(&printable);
                }
            }
        }
        InputEvent::KeyDown { key, modifiers } => {
            if session.is_editing_text() {
                match key {
                    Key::Backspace => session.backspace_text(),
                    Key::Enter | Key::Escape => session.finish_text_editing(),
                    _ => {}
                }
                return Ok(None);
            }
            match map_shortcut(key, modifiers) {
                Some(KeyAction::Command(command)) => session.execute(command)?,
                Some(KeyAction::Export(request)) => return Ok(Some(request)),
                None => {}
            }
        }
    }
    Ok(None)
}

/// Handles converting raw egui input into our domain-specific InputEvents
#[derive(Debug, Default)]
pub struct InputHandler {
    last_pointer_pos: Option<Pos2>,
    dragging: bool,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process raw egui input for a canvas occupying `canvas_rect` on screen.
    ///
    /// Drags only start inside the canvas but are followed outside it, so a
    /// release anywhere still ends the gesture.
    pub fn process_input(
        &mut self,
        ctx: &Context,
        canvas_rect: Rect,
        transform: CanvasTransform,
    ) -> Vec<InputEvent> {
        let mut events = Vec::new();
        let wants_keyboard = ctx.wants_keyboard_input();

        ctx.input(|input| {
            let pointer = &input.pointer;

            if pointer.button_pressed(PointerButton::Primary) {
                if let Some(pos) = pointer.interact_pos().filter(|p| canvas_rect.contains(*p)) {
                    self.dragging = true;
                    events.push(InputEvent::PointerDown {
                        position: transform.to_surface(pos),
                    });
                }
            }

            if let Some(pos) = pointer.hover_pos() {
                if self.dragging && Some(pos) != self.last_pointer_pos {
                    events.push(InputEvent::PointerMove {
                        position: transform.to_surface(pos),
                    });
                }
                self.last_pointer_pos = Some(pos);
            }

            if self.dragging && pointer.button_released(PointerButton::Primary) {
                self.dragging = false;
                let pos = pointer
                    .interact_pos()
                    .or(self.last_pointer_pos)
                    .unwrap_or(canvas_rect.center());
                events.push(InputEvent::PointerUp {
                    position: transform.to_surface(pos),
                });
            }

            // Text fields in the side panel own the keyboard while focused
            if wants_keyboard {
                return;
            }
            for event in &input.events {
                match event {
                    // Cmd/Ctrl+C arrives as a clipboard event, not a key press
                    egui::Event::Copy => events.push(InputEvent::KeyDown {
                        key: Key::C,
                        modifiers: Modifiers::COMMAND,
                    }),
                    egui::Event::Key {
                        key,
                        pressed: true,
                        modifiers,
                        ..
                    } => events.push(InputEvent::KeyDown {
                        key: *key,
                        modifiers: *modifiers,
                    }),
                    egui::Event::Text(text) => events.push(InputEvent::Text(text.clone())),
                    _ => {}
                }
            }
        });

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_letters_switch_tools() {
        assert_eq!(
            map_shortcut(Key::R, Modifiers::NONE),
            Some(KeyAction::Command(Command::SetTool(ToolMode::Rectangle)))
        );
        assert_eq!(
            map_shortcut(Key::X, Modifiers::NONE),
            Some(KeyAction::Command(Command::ToggleCrop))
        );
        assert_eq!(map_shortcut(Key::Q, Modifiers::NONE), None);
    }

    #[test]
    fn ctrl_c_copies_without_switching_to_ellipse() {
        assert_eq!(
            map_shortcut(Key::C, Modifiers::COMMAND),
            Some(KeyAction::Export(ExportRequest::Copy))
        );
        assert_eq!(map_shortcut(Key::R, Modifiers::CTRL), None);
    }
}
