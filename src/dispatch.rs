//! Action and command execution for App
//!
//! Keys, mouse gestures and the command line all end up here as an
//! [`Action`] or a [`Command`].

use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

use tracing::{error, info, warn};

use crate::app::{App, BackgroundResult};
use crate::export::{default_destination, export_pdf, ExportError, RasterRenderer, StaticPage};
use crate::input::Action;
use crate::mode::command::Command;
use crate::mode::Mode;
use crate::ui::style::Theme;

impl App {
    pub fn execute_action(&mut self, action: Action) {
        match action {
            Action::Undo => self.undo(),
            Action::Redo => self.redo(),
            Action::Export(destination) => self.start_export(destination),
            Action::ToggleStyle(flag) => {
                // nothing selected: silently ignored
                self.editor.toggle_style(flag);
            }
            Action::AddTextBox => {
                if self.editor.add_text_box().is_some() {
                    self.info(format!("Text box added to page {}", self.editor.active_page()));
                } else {
                    self.error("Could not add a text box");
                }
            }
            Action::AddPage => {
                if let Some(number) = self.editor.add_page() {
                    self.info(format!("Page {} added", number));
                }
            }
            Action::DeleteSelected => {
                if self.editor.delete_selected() {
                    self.info("Text box deleted");
                }
            }
            Action::Paste => match self.clipboard.fetch() {
                Ok(text) => self.paste(&text),
                Err(msg) => self.warn(msg),
            },
            Action::Cut => {
                if let Some(text) = self.editor.cut_content() {
                    self.insert_handler.reset();
                    let msg = self.clipboard.store(text);
                    self.info(msg);
                }
            }
            Action::CycleSelection { forward } => {
                if self.editor.cycle_selection(forward).is_none() {
                    self.warn("No text boxes on this page");
                }
            }
            Action::ClearSelection => self.editor.clear_selection(),
            Action::ScrollRows(rows) => {
                let delta = rows as f64 * self.geometry().px_per_row();
                self.editor.scroll_by(delta);
            }
            Action::StepPage(step) => {
                let count = self.editor.document().page_count() as isize;
                let target = (self.editor.active_page() as isize + step).clamp(1, count.max(1));
                self.editor.go_to_page(target as usize);
            }
            Action::FirstPage => {
                self.editor.go_to_page(1);
            }
            Action::LastPage => {
                let count = self.editor.document().page_count();
                self.editor.go_to_page(count);
            }
        }
    }

    pub fn execute_command(&mut self, cmd: Command) {
        match cmd {
            Command::Write(path) => {
                if let Some(path) = path {
                    self.file_io.set_path(path);
                }
                self.save();
            }
            Command::Quit => self.quit(false),
            Command::ForceQuit => self.quit(true),
            Command::WriteQuit => {
                if self.save() {
                    self.quit(false);
                }
            }
            Command::Export(destination) => self.start_export(destination),
            Command::Font(family) => {
                self.editor.set_font_family(&family);
                self.info(format!("Font: {}", family.trim()));
            }
            Command::Size(size) => {
                self.editor.set_font_size(size);
                self.info(format!("Font size: {}", size));
            }
            Command::Align(align) => {
                if self.editor.selection().is_none() {
                    self.warn("No text box selected");
                } else {
                    self.editor.set_alignment(align);
                }
            }
            Command::Toggle(flag) => {
                if self.editor.selection().is_none() {
                    self.warn("No text box selected");
                } else {
                    self.editor.toggle_style(flag);
                }
            }
            Command::Color { color, page } => {
                if self.check_page(page) {
                    self.editor.set_page_color(page, color);
                }
            }
            Command::PageSize { size, page } => {
                if self.check_page(page) {
                    self.editor.set_page_size(page, size);
                }
            }
            Command::Page(number) => {
                if !self.editor.go_to_page(number) {
                    self.error(format!(
                        "No page {} (document has {})",
                        number,
                        self.editor.document().page_count()
                    ));
                }
            }
            Command::Theme(name) => match Theme::resolve(&name) {
                Ok(theme) => {
                    self.info(format!("Theme: {}", theme.name));
                    self.style.set_theme(theme);
                }
                Err(e) => self.error(e),
            },
            Command::ThemeList => {
                self.info(format!("Themes: {}", Theme::builtin_names().join(", ")));
            }
            Command::Invalid(msg) => self.error(msg),
            Command::Unknown(cmd) => self.error(format!("Unknown command: {}", cmd)),
        }
    }

    fn check_page(&mut self, page: Option<usize>) -> bool {
        match page {
            Some(n) if self.editor.document().page(n).is_none() => {
                self.error(format!("No page {}", n));
                false
            }
            _ => true,
        }
    }

    fn undo(&mut self) {
        match self.editor.undo() {
            Ok(true) => self.set_mode(Mode::Normal),
            Ok(false) => {}
            Err(e) => {
                error!(error = %e, "undo failed");
                self.error(format!("Undo failed: {}", e));
            }
        }
    }

    fn redo(&mut self) {
        match self.editor.redo() {
            Ok(true) => self.set_mode(Mode::Normal),
            Ok(false) => {}
            Err(e) => {
                error!(error = %e, "redo failed");
                self.error(format!("Redo failed: {}", e));
            }
        }
    }

    /// Insert text where it belongs for the current mode
    pub fn paste(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        match self.mode {
            Mode::Insert => {
                let at = self.insert_handler.cursor();
                if self.editor.paste_content(at, text) {
                    self.insert_handler.advance(text);
                }
            }
            Mode::Normal => {
                let end = self.editor.selected_box().map(|b| b.content.len());
                match end {
                    Some(end) => {
                        self.editor.paste_content(end, text);
                    }
                    None => {
                        if self.editor.add_text_box_with(text).is_some() {
                            self.info("Pasted into a new text box");
                        }
                    }
                }
            }
            Mode::Command => {
                let line = text.lines().next().unwrap_or_default();
                self.command_handler.buffer.push_str(line);
            }
            Mode::Move | Mode::Resize => {}
        }
    }

    /// Write the document. Returns whether it was saved.
    fn save(&mut self) -> bool {
        self.editor.flush_pending();
        let snapshot = self.editor.snapshot();
        match self.file_io.write(&snapshot) {
            Ok(()) => {
                self.saved_revision = self.editor.revision();
                info!(path = %self.file_io.file_name(), "document saved");
                self.info(format!("Saved to {}", self.file_io.file_name()));
                true
            }
            Err(e) => {
                error!(error = %e, "save failed");
                self.error(format!("Error saving: {}", e));
                false
            }
        }
    }

    /// Freeze the pages and render them to PDF on a worker thread
    fn start_export(&mut self, destination: Option<PathBuf>) {
        if self.exporting {
            self.warn(ExportError::Busy.to_string());
            return;
        }
        self.editor.flush_pending();

        let renderer = match RasterRenderer::from_config(&self.config.export) {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "export fonts unavailable");
                self.error(format!("Export failed: {}", e));
                return;
            }
        };
        let pages = StaticPage::from_document(self.editor.document());
        let destination = destination.unwrap_or_else(|| {
            let dir = self
                .config
                .export
                .directory
                .clone()
                .unwrap_or_else(|| PathBuf::from("."));
            default_destination(&dir)
        });

        info!(pages = pages.len(), path = %destination.display(), "export started");
        let progress = self.start_progress("Exporting", pages.len());
        let (tx, rx) = mpsc::channel();
        let handle = thread::spawn(move || {
            let result = export_pdf(&renderer, &pages, &destination, &progress);
            let _ = tx.send(BackgroundResult::ExportComplete(result));
        });

        self.exporting = true;
        self.bg_receiver = Some(rx);
        self.bg_handle = Some(handle);
    }
}
