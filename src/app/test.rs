use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{backend::TestBackend, layout::Rect, Terminal};

use super::*;
use crate::document::{PageSize, Px};
use crate::editor::EditorSettings;

fn new_app() -> App {
    let config = AppConfig::default();
    let editor = Editor::new(&EditorSettings::default());
    App::new(editor, FileIO::new(None), config, Style::new(), Clipboard::local())
}

/// An app laid out on a 250x62 terminal: 4px per column, 8px per row
fn sized_app() -> App {
    let mut app = new_app();
    app.fit_viewport(Rect::new(0, 0, 250, 62));
    app
}

fn press(app: &mut App, code: KeyCode) {
    app.handle_event(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)));
}

fn ctrl(app: &mut App, c: char) {
    app.handle_event(Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)));
}

fn type_str(app: &mut App, s: &str) {
    for c in s.chars() {
        press(app, KeyCode::Char(c));
    }
}

fn command(app: &mut App, line: &str) {
    press(app, KeyCode::Char(':'));
    type_str(app, line);
    press(app, KeyCode::Enter);
}

fn mouse(app: &mut App, kind: MouseEventKind, column: u16, row: u16) {
    app.handle_event(Event::Mouse(MouseEvent {
        kind,
        column,
        row,
        modifiers: KeyModifiers::NONE,
    }));
}

fn first_box_content(app: &App) -> String {
    app.editor.document().page(1).unwrap().text_boxes[0].content.clone()
}

fn level(app: &App) -> Option<MessageLevel> {
    app.message.as_ref().map(|(level, _)| *level)
}

// === Keyboard editing ===

#[test]
fn test_typing_session_is_one_entry() {
    let mut app = new_app();
    ctrl(&mut app, 't');
    assert_eq!(app.editor.history().len(), 2);
    assert!(app.editor.selection().is_some());

    press(&mut app, KeyCode::Char('i'));
    assert_eq!(app.mode, Mode::Insert);
    type_str(&mut app, "AB");
    assert!(app.is_dirty());
    press(&mut app, KeyCode::Esc);

    assert_eq!(app.mode, Mode::Normal);
    assert_eq!(first_box_content(&app), "AB");
    assert_eq!(app.editor.history().len(), 3);

    ctrl(&mut app, 'z');
    assert_eq!(first_box_content(&app), "");
    ctrl(&mut app, 'y');
    assert_eq!(first_box_content(&app), "AB");
}

#[test]
fn test_formatting_shortcuts_wait_until_typing_ends() {
    let mut app = new_app();
    ctrl(&mut app, 't');
    press(&mut app, KeyCode::Char('i'));

    ctrl(&mut app, 'b');
    let text_box = app.editor.selected_box().unwrap();
    assert!(!text_box.bold);
    assert_eq!(text_box.content, "");

    press(&mut app, KeyCode::Esc);
    ctrl(&mut app, 'b');
    assert!(app.editor.selected_box().unwrap().bold);
}

#[test]
fn test_undo_while_typing_reverts_the_typing() {
    let mut app = new_app();
    ctrl(&mut app, 't');
    press(&mut app, KeyCode::Char('i'));
    type_str(&mut app, "x");

    ctrl(&mut app, 'z');
    assert_eq!(app.mode, Mode::Normal);
    assert_eq!(first_box_content(&app), "");
    assert!(app.editor.selection().is_none());

    ctrl(&mut app, 'y');
    assert_eq!(first_box_content(&app), "x");
}

#[test]
fn test_insert_needs_a_selection() {
    let mut app = new_app();
    press(&mut app, KeyCode::Char('i'));
    assert_eq!(app.mode, Mode::Normal);
    assert!(app.message.is_some());
}

#[test]
fn test_keyboard_move() {
    let mut app = new_app();
    ctrl(&mut app, 't');
    press(&mut app, KeyCode::Char('m'));
    assert_eq!(app.mode, Mode::Move);

    press(&mut app, KeyCode::Right);
    press(&mut app, KeyCode::Right);
    press(&mut app, KeyCode::Enter);

    assert_eq!(app.mode, Mode::Normal);
    assert_eq!(app.editor.selected_box().unwrap().left, Px(70.0));
    assert_eq!(app.editor.history().len(), 3);
}

// === Commands ===

#[test]
fn test_quit_warns_when_dirty() {
    let mut app = new_app();
    command(&mut app, "q");
    assert!(app.should_quit);

    let mut app = new_app();
    ctrl(&mut app, 't');
    command(&mut app, "q");
    assert!(!app.should_quit);
    assert_eq!(level(&app), Some(MessageLevel::Warning));

    command(&mut app, "q!");
    assert!(app.should_quit);
}

#[test]
fn test_write_clears_dirty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("doc.json");

    let mut app = new_app();
    ctrl(&mut app, 't');
    press(&mut app, KeyCode::Char('i'));
    type_str(&mut app, "hi");
    press(&mut app, KeyCode::Esc);
    assert!(app.is_dirty());

    app.execute_command(Command::Write(Some(path.clone())));
    assert!(!app.is_dirty());
    assert!(path.exists());
    assert_eq!(level(&app), Some(MessageLevel::Info));

    let loaded = FileIO::new(Some(path)).load().unwrap();
    let snapshot = loaded.snapshot.unwrap();
    assert_eq!(snapshot.text_box_count(), 1);
}

#[test]
fn test_write_without_path_is_an_error() {
    let mut app = new_app();
    command(&mut app, "w");
    assert_eq!(level(&app), Some(MessageLevel::Error));
}

#[test]
fn test_page_commands() {
    let mut app = new_app();
    command(&mut app, "pagesize letter");
    assert_eq!(app.editor.document().page(1).unwrap().size, PageSize::Letter);
    assert_eq!(app.editor.history().len(), 2);

    command(&mut app, "page 3");
    assert_eq!(level(&app), Some(MessageLevel::Error));

    command(&mut app, "color dark 2");
    assert_eq!(level(&app), Some(MessageLevel::Error));
    assert_eq!(app.editor.history().len(), 2);

    command(&mut app, "bogus");
    assert_eq!(
        app.message,
        Some((MessageLevel::Error, "Unknown command: bogus".to_string()))
    );
}

#[test]
fn test_page_navigation_clamps() {
    let mut app = new_app();
    ctrl(&mut app, 'n');
    ctrl(&mut app, 'n');
    assert_eq!(app.editor.document().page_count(), 3);

    press(&mut app, KeyCode::Char('G'));
    assert_eq!(app.editor.active_page(), 3);
    press(&mut app, KeyCode::Char('J'));
    assert_eq!(app.editor.active_page(), 3);
    press(&mut app, KeyCode::Char('K'));
    assert_eq!(app.editor.active_page(), 2);
    press(&mut app, KeyCode::Char('g'));
    press(&mut app, KeyCode::Char('K'));
    assert_eq!(app.editor.active_page(), 1);
}

#[test]
fn test_italic_from_command_line() {
    let mut app = new_app();
    command(&mut app, "italic");
    assert_eq!(level(&app), Some(MessageLevel::Warning));

    ctrl(&mut app, 't');
    command(&mut app, "italic");
    assert!(app.editor.selected_box().unwrap().italic);
    assert_eq!(app.editor.history().len(), 3);
}

#[test]
fn test_theme_command() {
    let mut app = new_app();
    command(&mut app, "theme dark");
    assert_eq!(app.style.theme.name, "dark");

    command(&mut app, "theme nope");
    assert_eq!(level(&app), Some(MessageLevel::Error));
    assert_eq!(app.style.theme.name, "dark");
}

// === Mouse ===

#[test]
fn test_mouse_drag_moves_box() {
    let mut app = sized_app();
    ctrl(&mut app, 't');
    press(&mut app, KeyCode::Esc);
    assert!(app.editor.selection().is_none());

    mouse(&mut app, MouseEventKind::Down(MouseButton::Left), 60, 10);
    assert!(app.editor.selection().is_some());
    mouse(&mut app, MouseEventKind::Drag(MouseButton::Left), 70, 12);
    mouse(&mut app, MouseEventKind::Up(MouseButton::Left), 70, 12);

    let text_box = app.editor.selected_box().unwrap();
    assert_eq!(text_box.left, Px(90.0));
    assert_eq!(text_box.top, Px(66.0));
    assert_eq!(app.editor.history().len(), 3);
}

#[test]
fn test_click_without_drag_records_nothing() {
    let mut app = sized_app();
    ctrl(&mut app, 't');
    mouse(&mut app, MouseEventKind::Down(MouseButton::Left), 60, 10);
    mouse(&mut app, MouseEventKind::Up(MouseButton::Left), 60, 10);
    assert_eq!(app.editor.history().len(), 2);
}

#[test]
fn test_mouse_resize_from_corner() {
    let mut app = sized_app();
    ctrl(&mut app, 't');

    mouse(&mut app, MouseEventKind::Down(MouseButton::Left), 113, 18);
    assert_eq!(app.active_handle(), Some(ResizeHandle::SE));
    mouse(&mut app, MouseEventKind::Drag(MouseButton::Left), 118, 20);
    mouse(&mut app, MouseEventKind::Up(MouseButton::Left), 118, 20);

    let text_box = app.editor.selected_box().unwrap();
    assert_eq!(text_box.width, Px(320.0));
    assert_eq!(text_box.height, Px(116.0));
    assert_eq!(app.active_handle(), None);
    assert_eq!(app.editor.history().len(), 3);
}

#[test]
fn test_click_on_paper_clears_selection() {
    let mut app = sized_app();
    ctrl(&mut app, 't');
    mouse(&mut app, MouseEventKind::Down(MouseButton::Left), 40, 40);
    assert!(app.editor.selection().is_none());
}

#[test]
fn test_click_elsewhere_ends_typing() {
    let mut app = sized_app();
    ctrl(&mut app, 't');
    press(&mut app, KeyCode::Char('i'));
    type_str(&mut app, "ab");

    // inside the box being edited: keep typing
    mouse(&mut app, MouseEventKind::Down(MouseButton::Left), 60, 10);
    assert_eq!(app.mode, Mode::Insert);

    mouse(&mut app, MouseEventKind::Down(MouseButton::Left), 40, 40);
    assert_eq!(app.mode, Mode::Normal);
    assert!(!app.editor.has_pending_edit());
    assert_eq!(app.editor.history().len(), 3);
}

#[test]
fn test_wheel_scrolls() {
    let mut app = sized_app();
    mouse(&mut app, MouseEventKind::ScrollDown, 60, 10);
    assert_eq!(app.editor.tracker().scroll(), 24.0);
}

// === Paste ===

#[test]
fn test_paste_event() {
    let mut app = new_app();
    app.handle_event(Event::Paste("hello".to_string()));
    assert_eq!(app.editor.selected_box().unwrap().content, "hello");

    press(&mut app, KeyCode::Char('i'));
    app.handle_event(Event::Paste(" world".to_string()));
    assert_eq!(app.editor.selected_box().unwrap().content, "hello world");
    assert_eq!(app.caret(), Some(11));
}

#[test]
fn test_cut_then_paste() {
    let mut app = new_app();
    app.handle_event(Event::Paste("moved".to_string()));
    ctrl(&mut app, 'x');
    assert_eq!(app.editor.selected_box().unwrap().content, "");
    assert_eq!(app.clipboard.register(), Some("moved"));

    ctrl(&mut app, 'v');
    assert_eq!(app.editor.selected_box().unwrap().content, "moved");
}

// === Export ===

#[test]
fn test_export_runs_in_background() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.pdf");

    let mut app = new_app();
    app.config.export.scale = 0.25;
    app.execute_command(Command::Export(Some(path.clone())));
    assert!(app.is_exporting());
    assert!(app.progress.is_some());

    app.execute_command(Command::Export(Some(dir.path().join("again.pdf"))));
    assert_eq!(
        app.message,
        Some((MessageLevel::Warning, "an export is already running".to_string()))
    );

    let deadline = Instant::now() + Duration::from_secs(30);
    while app.is_exporting() && Instant::now() < deadline {
        app.poll_background_result();
        thread::sleep(Duration::from_millis(10));
    }

    assert!(!app.is_exporting());
    assert!(app.progress.is_none());
    assert_eq!(level(&app), Some(MessageLevel::Info));
    assert!(path.exists());
    assert!(!dir.path().join("again.pdf").exists());
}

// === Rendering ===

fn row_text(terminal: &Terminal<TestBackend>, y: u16) -> String {
    let buffer = terminal.backend().buffer();
    (0..buffer.area.width)
        .map(|x| buffer.get(x, y).symbol().to_string())
        .collect()
}

#[test]
fn test_render_status_and_command_line() {
    let mut app = new_app();
    app.fit_viewport(Rect::new(0, 0, 100, 30));
    let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();

    terminal.draw(|f| ui::render(f, &app)).unwrap();
    let status = row_text(&terminal, 28);
    assert!(status.starts_with(" NORMAL  [No File]"));
    assert!(status.contains("p. 1/1"));

    press(&mut app, KeyCode::Char(':'));
    type_str(&mut app, "w");
    terminal.draw(|f| ui::render(f, &app)).unwrap();
    assert!(row_text(&terminal, 29).starts_with(":w"));
    assert!(row_text(&terminal, 28).starts_with(" COMMAND "));
}
