use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::editor::Editor;
use crate::input::{Action, KeyResult};
use crate::mode::Mode;

pub struct NormalHandler {}

impl NormalHandler {
    pub fn new() -> Self {
        Self {}
    }

    pub fn handle_key(&mut self, key: KeyEvent, editor: &Editor) -> KeyResult {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let has_selection = editor.selection().is_some();

        match key.code {
            KeyCode::Tab => KeyResult::Action(Action::CycleSelection { forward: true }),
            KeyCode::BackTab => KeyResult::Action(Action::CycleSelection { forward: false }),
            KeyCode::Esc => KeyResult::Action(Action::ClearSelection),
            KeyCode::Char('c') if ctrl => KeyResult::Quit,
            KeyCode::Char('r') if ctrl => KeyResult::Action(Action::Redo),
            KeyCode::Char('i') | KeyCode::Enter if !ctrl => {
                if has_selection {
                    KeyResult::SwitchMode(Mode::Insert)
                } else {
                    KeyResult::Message("No text box selected (Tab selects, Ctrl+T adds)".to_string())
                }
            }
            KeyCode::Char('m') if has_selection => KeyResult::SwitchMode(Mode::Move),
            KeyCode::Char('r') if has_selection => KeyResult::SwitchMode(Mode::Resize),
            KeyCode::Char('m') | KeyCode::Char('r') => {
                KeyResult::Message("No text box selected".to_string())
            }
            KeyCode::Char(':') => KeyResult::SwitchMode(Mode::Command),
            KeyCode::Char('u') if !ctrl => KeyResult::Action(Action::Undo),
            KeyCode::Char('a') if !ctrl => KeyResult::Action(Action::AddTextBox),
            KeyCode::Char('o') if !ctrl => KeyResult::Action(Action::AddPage),
            KeyCode::Char('p') if !ctrl => KeyResult::Action(Action::Paste),
            KeyCode::Char('x') if !ctrl => KeyResult::Action(Action::Cut),
            KeyCode::Char('j') | KeyCode::Down => KeyResult::Action(Action::ScrollRows(1)),
            KeyCode::Char('k') | KeyCode::Up => KeyResult::Action(Action::ScrollRows(-1)),
            KeyCode::Char('d') if ctrl => KeyResult::Action(Action::ScrollRows(10)),
            KeyCode::PageDown | KeyCode::Char('J') => KeyResult::Action(Action::StepPage(1)),
            KeyCode::PageUp | KeyCode::Char('K') => KeyResult::Action(Action::StepPage(-1)),
            KeyCode::Char('g') | KeyCode::Home => KeyResult::Action(Action::FirstPage),
            KeyCode::Char('G') | KeyCode::End => KeyResult::Action(Action::LastPage),
            KeyCode::Char('q') if !ctrl => KeyResult::Quit,
            _ => KeyResult::Continue,
        }
    }
}
