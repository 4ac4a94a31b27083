use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::editor::StyleFlag;
use crate::mode::Mode;

/// Result of handling a key event
pub enum KeyResult {
    /// Continue in current mode
    Continue,
    /// Switch to a different mode
    SwitchMode(Mode),
    /// Run an editing action
    Action(Action),
    /// Return to normal mode
    Finish,
    /// Show a message
    Message(String),
    /// Quit the application
    Quit,
}

/// Everything a key, a mouse gesture or a command can ask the app to do
#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    Undo,
    Redo,
    Export(Option<PathBuf>),
    ToggleStyle(StyleFlag),
    AddTextBox,
    AddPage,
    DeleteSelected,
    Paste,
    Cut,
    CycleSelection { forward: bool },
    ClearSelection,
    /// Scroll by terminal rows
    ScrollRows(i32),
    /// Jump pages relative to the active one
    StepPage(isize),
    FirstPage,
    LastPage,
}

/// Check for escape key (Esc or Ctrl+[)
pub fn is_escape(key: KeyEvent) -> bool {
    key.code == KeyCode::Esc
        || (key.code == KeyCode::Char('[') && key.modifiers.contains(KeyModifiers::CONTROL))
}

/// Global shortcuts, checked before the mode handler sees the key.
///
/// Undo, redo and export work everywhere except the command line. Paste and
/// cut work while browsing or typing. Formatting, adding boxes or pages and
/// Delete only work while browsing, so they never fire while a box is being
/// edited or dragged.
pub fn shortcut(key: KeyEvent, mode: Mode) -> Option<Action> {
    if mode == Mode::Command {
        return None;
    }
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    let global = match key.code {
        KeyCode::Char('z') if ctrl => Some(Action::Undo),
        KeyCode::Char('y') if ctrl => Some(Action::Redo),
        KeyCode::Char('s') if ctrl => Some(Action::Export(None)),
        _ => None,
    };
    if global.is_some() {
        return global;
    }

    if mode.owns_input() && mode != Mode::Insert {
        return None;
    }
    match key.code {
        KeyCode::Char('v') if ctrl => return Some(Action::Paste),
        KeyCode::Char('x') if ctrl => return Some(Action::Cut),
        _ => {}
    }

    if mode != Mode::Normal {
        return None;
    }
    match key.code {
        KeyCode::Char('b') if ctrl => Some(Action::ToggleStyle(StyleFlag::Bold)),
        KeyCode::Char('i') if ctrl => Some(Action::ToggleStyle(StyleFlag::Italic)),
        KeyCode::Char('u') if ctrl => Some(Action::ToggleStyle(StyleFlag::Underline)),
        KeyCode::Char('t') if ctrl => Some(Action::AddTextBox),
        KeyCode::Char('n') if ctrl => Some(Action::AddPage),
        KeyCode::Delete => Some(Action::DeleteSelected),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[test]
    fn test_global_shortcuts() {
        for mode in [Mode::Normal, Mode::Insert, Mode::Move, Mode::Resize] {
            assert_eq!(shortcut(ctrl('z'), mode), Some(Action::Undo));
            assert_eq!(shortcut(ctrl('y'), mode), Some(Action::Redo));
            assert_eq!(shortcut(ctrl('s'), mode), Some(Action::Export(None)));
        }
    }

    #[test]
    fn test_formatting_shortcuts_in_normal_mode() {
        assert_eq!(shortcut(ctrl('b'), Mode::Normal), Some(Action::ToggleStyle(StyleFlag::Bold)));
        assert_eq!(shortcut(ctrl('i'), Mode::Normal), Some(Action::ToggleStyle(StyleFlag::Italic)));
        assert_eq!(shortcut(ctrl('u'), Mode::Normal), Some(Action::ToggleStyle(StyleFlag::Underline)));
        assert_eq!(shortcut(ctrl('t'), Mode::Normal), Some(Action::AddTextBox));
        assert_eq!(shortcut(ctrl('n'), Mode::Normal), Some(Action::AddPage));
        let delete = KeyEvent::new(KeyCode::Delete, KeyModifiers::NONE);
        assert_eq!(shortcut(delete, Mode::Normal), Some(Action::DeleteSelected));
    }

    #[test]
    fn test_typing_suppresses_structure_shortcuts() {
        for c in ['b', 'i', 'u', 't', 'n'] {
            assert_eq!(shortcut(ctrl(c), Mode::Insert), None);
        }
        let delete = KeyEvent::new(KeyCode::Delete, KeyModifiers::NONE);
        assert_eq!(shortcut(delete, Mode::Insert), None);
        assert_eq!(shortcut(ctrl('v'), Mode::Insert), Some(Action::Paste));
        assert_eq!(shortcut(ctrl('x'), Mode::Insert), Some(Action::Cut));
    }

    #[test]
    fn test_gestures_and_command_line_own_input() {
        assert_eq!(shortcut(ctrl('v'), Mode::Move), None);
        assert_eq!(shortcut(ctrl('b'), Mode::Resize), None);
        assert_eq!(shortcut(ctrl('z'), Mode::Command), None);
    }

    #[test]
    fn test_plain_keys_are_not_shortcuts() {
        let key = KeyEvent::new(KeyCode::Char('b'), KeyModifiers::NONE);
        assert_eq!(shortcut(key, Mode::Normal), None);
    }

    #[test]
    fn test_is_escape() {
        assert!(is_escape(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)));
        assert!(is_escape(ctrl('[')));
        assert!(!is_escape(ctrl('z')));
    }
}
