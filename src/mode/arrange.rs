//! Keyboard drag and resize
//!
//! Arrow keys drive a virtual pointer through the same gestures the mouse
//! uses, so keyboard and mouse arrangement record history identically.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::editor::{Editor, Pointer, ResizeHandle};
use crate::input::{is_escape, KeyResult};
use crate::mode::Mode;

/// Pixels per arrow key press
pub const STEP_PX: f64 = 10.0;
/// Pixels per Shift+arrow press
pub const FINE_STEP_PX: f64 = 1.0;

pub struct ArrangeHandler {
    pointer: Pointer,
    handle: ResizeHandle,
    moved: bool,
}

impl ArrangeHandler {
    pub fn new() -> Self {
        Self {
            pointer: Pointer::new(0.0, 0.0),
            handle: ResizeHandle::SE,
            moved: false,
        }
    }

    /// Handle the next resize starts from
    pub fn handle(&self) -> ResizeHandle {
        self.handle
    }

    /// Start a gesture on the selected box for `mode`
    pub fn begin(&mut self, mode: Mode, editor: &mut Editor) -> Result<(), String> {
        let id = editor
            .selection()
            .cloned()
            .ok_or_else(|| "No text box selected".to_string())?;
        self.pointer = Pointer::new(0.0, 0.0);
        self.moved = false;
        let started = match mode {
            Mode::Move => editor.begin_drag(&id, self.pointer),
            Mode::Resize => editor.begin_resize(&id, self.handle, self.pointer),
            _ => false,
        };
        if started {
            Ok(())
        } else {
            Err(format!("Cannot {} text box", mode.display_name().to_lowercase()))
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, mode: Mode, editor: &mut Editor) -> KeyResult {
        if is_escape(key) {
            editor.cancel_gesture();
            return KeyResult::Finish;
        }
        let step = if key.modifiers.contains(KeyModifiers::SHIFT) {
            FINE_STEP_PX
        } else {
            STEP_PX
        };

        let (dx, dy) = match key.code {
            KeyCode::Left | KeyCode::Char('h') => (-step, 0.0),
            KeyCode::Right | KeyCode::Char('l') => (step, 0.0),
            KeyCode::Up | KeyCode::Char('k') => (0.0, -step),
            KeyCode::Down | KeyCode::Char('j') => (0.0, step),
            KeyCode::Enter => {
                editor.end_gesture();
                return KeyResult::Finish;
            }
            KeyCode::Tab if mode == Mode::Resize => {
                self.next_handle(editor);
                return KeyResult::Message(format!("Resizing from {}", self.handle));
            }
            _ => return KeyResult::Continue,
        };

        self.pointer = Pointer::new(self.pointer.x.value() + dx, self.pointer.y.value() + dy);
        if editor.update_gesture(self.pointer) {
            self.moved = true;
            KeyResult::Continue
        } else {
            KeyResult::Finish
        }
    }

    /// Switch handles mid-resize. Finished work is kept as its own entry.
    fn next_handle(&mut self, editor: &mut Editor) {
        let id = match editor.gesture() {
            Some(g) => g.id().clone(),
            None => return,
        };
        if self.moved {
            editor.end_gesture();
        } else {
            editor.cancel_gesture();
        }

        let idx = ResizeHandle::ALL
            .iter()
            .position(|h| *h == self.handle)
            .unwrap_or(0);
        self.handle = ResizeHandle::ALL[(idx + 1) % ResizeHandle::ALL.len()];
        self.pointer = Pointer::new(0.0, 0.0);
        self.moved = false;
        editor.begin_resize(&id, self.handle, self.pointer);
    }
}
