//! Terminal event classification for the display runtime.

#![allow(missing_docs)]

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
};

use crate::display::input::InputKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    Quit,
    /// Forward to the display as an activity event.
    Activity(InputKind),
    Resize,
}

/// Map one terminal event to an action. `None` means ignore.
#[must_use]
pub fn resolve(event: &Event) -> Option<InputAction> {
    match event {
        Event::Key(key) => resolve_key(key),
        Event::Mouse(mouse) => resolve_mouse(mouse),
        Event::Resize(_, _) => Some(InputAction::Resize),
        Event::FocusGained | Event::FocusLost | Event::Paste(_) => None,
    }
}

fn resolve_key(key: &KeyEvent) -> Option<InputAction> {
    // Releases and repeats would double-count one physical press.
    if key.kind != KeyEventKind::Press {
        return None;
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Some(InputAction::Quit),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(InputAction::Quit)
        }
        _ => Some(InputAction::Activity(InputKind::KeyDown)),
    }
}

fn resolve_mouse(mouse: &MouseEvent) -> Option<InputAction> {
    match mouse.kind {
        MouseEventKind::Moved | MouseEventKind::Drag(_) => {
            Some(InputAction::Activity(InputKind::PointerMove))
        }
        MouseEventKind::Down(_) => Some(InputAction::Activity(InputKind::PointerDown)),
        MouseEventKind::Up(_)
        | MouseEventKind::ScrollDown
        | MouseEventKind::ScrollUp
        | MouseEventKind::ScrollLeft
        | MouseEventKind::ScrollRight => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventState, MouseButton};

    fn key(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent::new(code, modifiers))
    }

    fn mouse(kind: MouseEventKind) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column: 3,
            row: 4,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn quit_keys() {
        for event in [
            key(KeyCode::Char('q'), KeyModifiers::NONE),
            key(KeyCode::Esc, KeyModifiers::NONE),
            key(KeyCode::Char('c'), KeyModifiers::CONTROL),
        ] {
            assert_eq!(resolve(&event), Some(InputAction::Quit));
        }
    }

    #[test]
    fn other_keys_are_activity() {
        for event in [
            key(KeyCode::Char('c'), KeyModifiers::NONE),
            key(KeyCode::Enter, KeyModifiers::NONE),
            key(KeyCode::Char(' '), KeyModifiers::SHIFT),
        ] {
            assert_eq!(
                resolve(&event),
                Some(InputAction::Activity(InputKind::KeyDown))
            );
        }
    }

    #[test]
    fn key_release_is_ignored() {
        let release = Event::Key(KeyEvent {
            code: KeyCode::Char('x'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        });
        assert_eq!(resolve(&release), None);
    }

    #[test]
    fn mouse_mapping() {
        assert_eq!(
            resolve(&mouse(MouseEventKind::Moved)),
            Some(InputAction::Activity(InputKind::PointerMove))
        );
        assert_eq!(
            resolve(&mouse(MouseEventKind::Drag(MouseButton::Left))),
            Some(InputAction::Activity(InputKind::PointerMove))
        );
        assert_eq!(
            resolve(&mouse(MouseEventKind::Down(MouseButton::Right))),
            Some(InputAction::Activity(InputKind::PointerDown))
        );
        assert_eq!(resolve(&mouse(MouseEventKind::Up(MouseButton::Left))), None);
        assert_eq!(resolve(&mouse(MouseEventKind::ScrollUp)), None);
    }

    #[test]
    fn resize_requests_redraw() {
        assert_eq!(resolve(&Event::Resize(100, 30)), Some(InputAction::Resize));
    }
}
