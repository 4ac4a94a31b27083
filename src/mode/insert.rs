use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::editor::{floor_char_boundary, Editor};
use crate::input::{is_escape, KeyResult};

/// Insert mode: types into the selected box.
/// Note: cursor is a BYTE offset into the content, always on a char boundary
pub struct InsertHandler {
    cursor: usize,
}

impl InsertHandler {
    pub fn new() -> Self {
        Self { cursor: 0 }
    }

    /// Place the caret at the end of the box being entered
    pub fn start_edit(&mut self, content: &str) {
        self.cursor = content.len();
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Move the caret after text inserted at it (a paste)
    pub fn advance(&mut self, inserted: &str) {
        self.cursor += inserted.len();
    }

    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    pub fn handle_key(&mut self, key: KeyEvent, editor: &mut Editor, now: Instant) -> KeyResult {
        if is_escape(key) {
            return KeyResult::Finish;
        }
        let content = match editor.selected_box() {
            Some(b) => b.content.as_str(),
            None => return KeyResult::Finish,
        };
        let at = floor_char_boundary(content, self.cursor);
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Char(c) if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
                editor.edit_content(now, |s| s.insert(at, c));
                self.cursor = at + c.len_utf8();
            }
            KeyCode::Enter => {
                editor.edit_content(now, |s| s.insert(at, '\n'));
                self.cursor = at + 1;
            }
            KeyCode::Backspace => {
                if at > 0 {
                    let prev = prev_boundary(content, at);
                    editor.edit_content(now, |s| s.replace_range(prev..at, ""));
                    self.cursor = prev;
                }
            }
            KeyCode::Delete => {
                if at < content.len() {
                    let next = next_boundary(content, at);
                    editor.edit_content(now, |s| s.replace_range(at..next, ""));
                    self.cursor = at;
                }
            }
            KeyCode::Left if ctrl => self.cursor = word_start(content, at),
            KeyCode::Right if ctrl => self.cursor = word_end(content, at),
            KeyCode::Left => self.cursor = prev_boundary(content, at),
            KeyCode::Right => self.cursor = next_boundary(content, at),
            KeyCode::Home => self.cursor = line_start(content, at),
            KeyCode::End => self.cursor = line_end(content, at),
            KeyCode::Up => self.cursor = vertical(content, at, false),
            KeyCode::Down => self.cursor = vertical(content, at, true),
            _ => {}
        }
        KeyResult::Continue
    }
}

fn prev_boundary(s: &str, at: usize) -> usize {
    s[..at].char_indices().next_back().map(|(i, _)| i).unwrap_or(0)
}

fn next_boundary(s: &str, at: usize) -> usize {
    s[at..].chars().next().map(|c| at + c.len_utf8()).unwrap_or(s.len())
}

/// Start of the word before the caret, skipping whitespace first
pub fn word_start(s: &str, at: usize) -> usize {
    let before = &s[..at];
    let trimmed = before.trim_end();
    trimmed
        .char_indices()
        .rev()
        .find(|(_, c)| c.is_whitespace())
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0)
}

/// End of the word after the caret, skipping whitespace first
pub fn word_end(s: &str, at: usize) -> usize {
    let after = &s[at..];
    let skipped = after.len() - after.trim_start().len();
    let start = at + skipped;
    s[start..]
        .char_indices()
        .find(|(_, c)| c.is_whitespace())
        .map(|(i, _)| start + i)
        .unwrap_or(s.len())
}

fn line_start(s: &str, at: usize) -> usize {
    s[..at].rfind('\n').map(|i| i + 1).unwrap_or(0)
}

fn line_end(s: &str, at: usize) -> usize {
    s[at..].find('\n').map(|i| at + i).unwrap_or(s.len())
}

/// Same column (in chars) on the neighbouring line, clamped to its length
fn vertical(s: &str, at: usize, down: bool) -> usize {
    let start = line_start(s, at);
    let column = s[start..at].chars().count();
    let target = if down {
        let end = line_end(s, at);
        if end == s.len() {
            return at;
        }
        end + 1
    } else {
        if start == 0 {
            return at;
        }
        line_start(s, start - 1)
    };
    let target_end = line_end(s, target);
    s[target..target_end]
        .char_indices()
        .nth(column)
        .map(|(i, _)| target + i)
        .unwrap_or(target_end)
}
