use std::io;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, poll, Event, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{backend::Backend, layout::Rect, Terminal};
use tracing::{debug, error};

use crate::clipboard::Clipboard;
use crate::config::AppConfig;
use crate::editor::{Editor, Gesture, ResizeHandle};
use crate::export::ExportError;
use crate::fileio::FileIO;
use crate::input::{is_escape, shortcut, KeyResult};
use crate::mode::arrange::ArrangeHandler;
use crate::mode::command::{Command, CommandHandler};
use crate::mode::insert::InsertHandler;
use crate::mode::normal::NormalHandler;
use crate::mode::Mode;
use crate::progress::Progress;
use crate::ui::{self, pageview::{Hit, ViewGeometry}, style::Style};

#[cfg(test)]
mod test;

/// Terminal rows scrolled per mouse wheel notch
const WHEEL_ROWS: f64 = 3.0;

/// Result from a background operation
pub enum BackgroundResult {
    ExportComplete(Result<PathBuf, ExportError>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Warning,
    Error,
}

pub struct App {
    pub editor: Editor,
    pub file_io: FileIO,
    pub clipboard: Clipboard,
    pub style: Style,
    pub config: AppConfig,
    pub mode: Mode,
    pub message: Option<(MessageLevel, String)>,
    pub should_quit: bool,
    pub progress: Option<(String, Progress)>, // (operation name, progress)
    pub(crate) saved_revision: u64,
    pub(crate) exporting: bool,
    page_area: Rect,
    // Background task handling
    pub(crate) bg_receiver: Option<Receiver<BackgroundResult>>,
    #[allow(dead_code)]
    pub(crate) bg_handle: Option<JoinHandle<()>>,
    // Mode handlers
    normal_handler: NormalHandler,
    pub(crate) insert_handler: InsertHandler,
    pub(crate) command_handler: CommandHandler,
    arrange_handler: ArrangeHandler,
}

impl App {
    pub fn new(
        editor: Editor,
        file_io: FileIO,
        config: AppConfig,
        style: Style,
        clipboard: Clipboard,
    ) -> Self {
        let saved_revision = editor.revision();
        Self {
            editor,
            file_io,
            clipboard,
            style,
            config,
            mode: Mode::Normal,
            message: None,
            should_quit: false,
            progress: None,
            saved_revision,
            exporting: false,
            page_area: Rect::default(),
            bg_receiver: None,
            bg_handle: None,
            normal_handler: NormalHandler::new(),
            insert_handler: InsertHandler::new(),
            command_handler: CommandHandler::new(),
            arrange_handler: ArrangeHandler::new(),
        }
    }

    pub fn command_buffer(&self) -> &str {
        &self.command_handler.buffer
    }

    /// Caret byte offset in the selected box while typing
    pub fn caret(&self) -> Option<usize> {
        match self.mode {
            Mode::Insert => Some(self.insert_handler.cursor()),
            _ => None,
        }
    }

    /// The handle being dragged, by mouse or keyboard
    pub fn active_handle(&self) -> Option<ResizeHandle> {
        if self.mode == Mode::Resize {
            return Some(self.arrange_handler.handle());
        }
        match self.editor.gesture() {
            Some(Gesture::Resize(g)) => Some(g.handle),
            _ => None,
        }
    }

    /// Unsaved changes, counting typing that has not been committed yet
    pub fn is_dirty(&self) -> bool {
        self.editor.revision() != self.saved_revision || self.editor.has_pending_edit()
    }

    pub fn is_exporting(&self) -> bool {
        self.exporting
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.message = Some((MessageLevel::Info, text.into()));
    }

    pub fn warn(&mut self, text: impl Into<String>) {
        self.message = Some((MessageLevel::Warning, text.into()));
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.message = Some((MessageLevel::Error, text.into()));
    }

    /// Start a progress indicator for a long-running operation
    pub fn start_progress(&mut self, operation: &str, total: usize) -> Progress {
        let progress = Progress::new(total);
        self.progress = Some((operation.to_string(), progress.clone()));
        progress
    }

    /// Clear the progress indicator
    pub fn clear_progress(&mut self) {
        self.progress = None;
    }

    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        while !self.should_quit {
            // Check for completed background operations
            self.poll_background_result();

            self.fit_viewport(terminal.size()?);
            terminal.draw(|f| ui::render(f, self))?;
            self.editor.settle();

            if poll(Duration::from_millis(16))? {
                let event = event::read()?;
                self.handle_event(event);
            }
            self.editor.tick(Instant::now());
        }
        Ok(())
    }

    /// Size the page area to the terminal and tell the tracker how much of
    /// the stack is visible
    pub fn fit_viewport(&mut self, size: Rect) {
        self.page_area = ui::page_area(size);
        let viewport = self.geometry().viewport_px();
        if (viewport - self.editor.tracker().viewport()).abs() > f64::EPSILON {
            self.editor.set_viewport(viewport);
        }
    }

    pub fn geometry(&self) -> ViewGeometry {
        ViewGeometry::new(self.page_area, self.editor.document(), self.editor.tracker())
    }

    /// Check for and handle completed background operations
    pub fn poll_background_result(&mut self) {
        if let Some(ref receiver) = self.bg_receiver {
            match receiver.try_recv() {
                Ok(result) => {
                    self.handle_background_result(result);
                    self.finish_background();
                }
                Err(mpsc::TryRecvError::Empty) => {
                    // Still working, progress is updated by the background thread
                }
                Err(mpsc::TryRecvError::Disconnected) => {
                    error!("background worker exited without a result");
                    self.finish_background();
                    self.error("Export failed");
                }
            }
        }
    }

    fn finish_background(&mut self) {
        self.bg_receiver = None;
        self.bg_handle = None;
        self.exporting = false;
        self.clear_progress();
    }

    fn handle_background_result(&mut self, result: BackgroundResult) {
        match result {
            BackgroundResult::ExportComplete(Ok(path)) => {
                self.info(format!("Exported to {}", path.display()));
            }
            BackgroundResult::ExportComplete(Err(e)) => {
                error!(error = %e, "export failed");
                self.error(format!("Export failed: {}", e));
            }
        }
    }

    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                self.message = None;
                self.handle_key(key);
            }
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Paste(text) => self.paste(&text),
            _ => {}
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if let Some(action) = shortcut(key, self.mode) {
            self.execute_action(action);
            return;
        }

        let result = match self.mode {
            Mode::Normal => self.normal_handler.handle_key(key, &self.editor),
            Mode::Insert => self.insert_handler.handle_key(key, &mut self.editor, Instant::now()),
            Mode::Command => {
                self.handle_command_mode(key);
                return;
            }
            Mode::Move | Mode::Resize => {
                self.arrange_handler.handle_key(key, self.mode, &mut self.editor)
            }
        };
        self.process_key_result(result);
    }

    fn handle_command_mode(&mut self, key: KeyEvent) {
        if is_escape(key) {
            self.mode = Mode::Normal;
            self.command_handler.buffer.clear();
            return;
        }

        if let Some(cmd_str) = self.command_handler.handle_key(key) {
            self.mode = Mode::Normal;
            if let Some(cmd) = Command::parse(&cmd_str) {
                debug!(command = %cmd_str, "command");
                self.execute_command(cmd);
            }
        }
    }

    fn process_key_result(&mut self, result: KeyResult) {
        match result {
            KeyResult::Continue => {}
            KeyResult::SwitchMode(mode) => self.set_mode(mode),
            KeyResult::Action(action) => self.execute_action(action),
            KeyResult::Finish => self.set_mode(Mode::Normal),
            KeyResult::Message(msg) => self.info(msg),
            KeyResult::Quit => self.quit(false),
        }
    }

    /// Switch modes, closing out whatever the old mode had open
    pub fn set_mode(&mut self, mode: Mode) {
        if self.mode == mode {
            return;
        }
        if self.mode == Mode::Insert {
            self.editor.end_edit();
        }
        if self.mode.is_gesture() && self.editor.gesture().is_some() {
            self.editor.cancel_gesture();
        }

        let entered = match mode {
            Mode::Insert => match self.editor.selected_box() {
                Some(b) => {
                    self.insert_handler.start_edit(&b.content);
                    Ok(())
                }
                None => Err("No text box selected".to_string()),
            },
            Mode::Command => {
                self.command_handler.start();
                Ok(())
            }
            Mode::Move | Mode::Resize => self.arrange_handler.begin(mode, &mut self.editor),
            Mode::Normal => Ok(()),
        };

        match entered {
            Ok(()) => self.mode = mode,
            Err(msg) => {
                self.mode = Mode::Normal;
                self.warn(msg);
            }
        }
    }

    pub fn quit(&mut self, force: bool) {
        if force {
            self.should_quit = true;
        } else if self.is_dirty() {
            self.warn("Unsaved changes! Use :q! to force quit");
        } else if self.exporting {
            self.warn("Export still running! Use :q! to force quit");
        } else {
            self.should_quit = true;
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        if self.mode == Mode::Command || self.mode.is_gesture() {
            return;
        }
        let geometry = self.geometry();
        let pointer = geometry.pointer_at(mouse.column, mouse.row);

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let hit = geometry.hit(self.editor.document(), mouse.column, mouse.row);
                let target = match &hit {
                    Some(Hit::Body(id)) | Some(Hit::Handle(id, _)) => Some(id.clone()),
                    _ => None,
                };
                // clicks inside the box being typed into keep typing
                if self.mode == Mode::Insert {
                    if target.is_some() && target.as_ref() == self.editor.selection() {
                        return;
                    }
                    self.set_mode(Mode::Normal);
                }
                match hit {
                    Some(Hit::Body(id)) => {
                        self.editor.begin_drag(&id, pointer);
                    }
                    Some(Hit::Handle(id, handle)) => {
                        self.editor.begin_resize(&id, handle, pointer);
                    }
                    Some(Hit::Page(_)) | None => self.editor.clear_selection(),
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if self.editor.gesture().is_some() {
                    self.editor.update_gesture(pointer);
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                if self.editor.gesture().is_some() && !self.editor.end_gesture() {
                    debug!("click without drag");
                }
            }
            MouseEventKind::ScrollDown => {
                self.editor.scroll_by(WHEEL_ROWS * geometry.px_per_row());
            }
            MouseEventKind::ScrollUp => {
                self.editor.scroll_by(-WHEEL_ROWS * geometry.px_per_row());
            }
            _ => {}
        }
    }
}
