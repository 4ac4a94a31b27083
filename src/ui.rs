pub mod pageview;
pub mod style;

use std::rc::Rc;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::app::{App, MessageLevel};
use crate::mode::Mode;
use pageview::{PageView, ViewGeometry};

fn layout(area: Rect) -> Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area)
}

/// Where the pages are drawn inside the full terminal area
pub fn page_area(area: Rect) -> Rect {
    layout(area)[0]
}

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = layout(frame.size());

    render_pages(frame, app, chunks[0]);
    render_status_bar(frame, app, chunks[1]);
    render_command_line(frame, app, chunks[2]);
}

fn render_pages(frame: &mut Frame, app: &App, area: Rect) {
    let editor = &app.editor;
    let geometry = ViewGeometry::new(area, editor.document(), editor.tracker());
    let view = PageView::new(editor.document(), &geometry, &app.style)
        .selection(editor.selection())
        .caret(app.caret())
        .handles(app.mode != Mode::Insert, app.active_handle());
    frame.render_widget(view, area);
}

/// Font, size, styles and alignment of the selected box
fn selection_summary(app: &App) -> Option<String> {
    let text_box = app.editor.selected_box()?;
    let mut flags = String::new();
    if text_box.bold {
        flags.push('B');
    }
    if text_box.italic {
        flags.push('I');
    }
    if text_box.underline {
        flags.push('U');
    }
    let mut summary = format!("{} {}", text_box.font_family, text_box.font_size);
    if !flags.is_empty() {
        summary.push(' ');
        summary.push_str(&flags);
    }
    summary.push(' ');
    summary.push_str(text_box.align.name());
    Some(summary)
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let style = &app.style;
    let editor = &app.editor;

    let file_name = if app.file_io.file_path.is_some() {
        app.file_io.file_name()
    } else {
        "[No File]".to_string()
    };
    let dirty = if app.is_dirty() { " [+]" } else { "" };

    let mut right = Vec::new();
    if let Some((operation, progress)) = &app.progress {
        right.push(progress.format(operation));
    }
    if let Some(summary) = selection_summary(app) {
        right.push(summary);
    }
    let history = editor.history();
    right.push(format!("undo {} redo {}", history.undo_levels(), history.redo_levels()));
    right.push(format!(
        "p. {}/{} ",
        editor.active_page(),
        editor.document().page_count()
    ));
    let right = right.join(" | ");

    let mode = format!(" {} ", app.mode.display_name());
    let used = mode.width() + 1 + file_name.width() + dirty.width() + right.width();
    let padding = (area.width as usize).saturating_sub(used).max(1);

    let mut spans = vec![
        Span::styled(mode, style.status_mode(app.mode)),
        Span::raw(" "),
        Span::raw(file_name),
        Span::styled(dirty, style.status_dirty()),
        Span::raw(" ".repeat(padding)),
    ];
    if app.progress.is_some() {
        spans.push(Span::styled(right, style.status_progress()));
    } else {
        spans.push(Span::raw(right));
    }

    let status_bar = Paragraph::new(Line::from(spans)).style(style.status_bar());
    frame.render_widget(status_bar, area);
}

fn render_command_line(frame: &mut Frame, app: &App, area: Rect) {
    let style = &app.style;
    let line = match app.mode {
        Mode::Command => {
            let buffer = app.command_buffer();
            let cursor_x = area.x + 1 + buffer.width() as u16;
            frame.set_cursor(cursor_x.min(area.right().saturating_sub(1)), area.y);
            Line::from(vec![
                Span::styled(":", style.command_prompt()),
                Span::styled(buffer.to_string(), style.command_line()),
            ])
        }
        _ => match &app.message {
            Some((level, text)) => {
                let s = match level {
                    MessageLevel::Info => style.message_info(),
                    MessageLevel::Warning => style.message_warning(),
                    MessageLevel::Error => style.message_error(),
                };
                Line::from(Span::styled(text.clone(), s))
            }
            None => Line::default(),
        },
    };

    frame.render_widget(Paragraph::new(line), area);
}
