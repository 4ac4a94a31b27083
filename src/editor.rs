//! The editing controller
//!
//! `Editor` owns the live document together with everything that has to stay
//! consistent with it: the session, the undo history, the restore guard and
//! page visibility. Every mutating operation commits exactly one history
//! entry after the change is applied; selection changes never do.

pub mod debounce;
pub mod gesture;
pub mod session;


use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::document::{Document, PageSize, PaperColor, Px, TextAlign, TextBox, TextBoxId};
use crate::history::{capture_state, rebuild, HistoryStore, RestoreError, Restorer, Snapshot};
use crate::visibility::PageTracker;

pub use debounce::Debouncer;
pub use gesture::{DragGesture, Gesture, Pointer, ResizeGesture, ResizeHandle};
pub use session::{IdGenerator, Session};

/// Startup values for a new editor
#[derive(Debug, Clone, PartialEq)]
pub struct EditorSettings {
    pub max_entries: usize,
    pub debounce: Duration,
    pub font_family: String,
    pub font_size: Px,
    pub page_size: PageSize,
    pub paper: PaperColor,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            max_entries: crate::history::DEFAULT_MAX_ENTRIES,
            debounce: Duration::from_millis(500),
            font_family: "Arial".to_string(),
            font_size: Px(14.0),
            page_size: PageSize::A4,
            paper: PaperColor::Default,
        }
    }
}

/// Which of the three boolean text styles to flip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleFlag {
    Bold,
    Italic,
    Underline,
}

pub struct Editor {
    doc: Document,
    session: Session,
    history: HistoryStore,
    restorer: Restorer,
    tracker: PageTracker,
    debounce: Debouncer,
    ids: IdGenerator,
    gesture: Option<Gesture>,
    /// Bumped on every committed change or restore
    revision: u64,
}

impl Editor {
    /// A single empty page; that state becomes the first history entry
    pub fn new(settings: &EditorSettings) -> Self {
        let doc = Document::new(settings.page_size, settings.paper);
        Self::with_document(doc, settings, 1)
    }

    /// Start from a stored snapshot (a loaded file). The snapshot is rebuilt
    /// strictly, so a malformed one is rejected before anything is set up.
    pub fn from_snapshot(snapshot: &Snapshot, settings: &EditorSettings) -> Result<Self, RestoreError> {
        let doc = rebuild(snapshot)?;
        let active = snapshot.active_page.clamp(1, doc.page_count());
        Ok(Self::with_document(doc, settings, active))
    }

    fn with_document(doc: Document, settings: &EditorSettings, active_page: usize) -> Self {
        let mut session = Session::new(settings.font_family.clone(), settings.font_size);
        session.active_page = active_page;

        let mut ids = IdGenerator::new();
        ids.observe(&doc);

        let mut editor = Self {
            tracker: PageTracker::new(&doc),
            doc,
            session,
            history: HistoryStore::with_max_entries(settings.max_entries),
            restorer: Restorer::new(),
            debounce: Debouncer::new(settings.debounce),
            ids,
            gesture: None,
            revision: 0,
        };
        editor.tracker.scroll_to_page(active_page);
        editor.commit();
        editor.revision = 0;
        editor
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn restorer(&self) -> &Restorer {
        &self.restorer
    }

    pub fn tracker(&self) -> &PageTracker {
        &self.tracker
    }

    pub fn gesture(&self) -> Option<&Gesture> {
        self.gesture.as_ref()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn active_page(&self) -> usize {
        self.session.active_page
    }

    pub fn selection(&self) -> Option<&TextBoxId> {
        self.session.selection.as_ref()
    }

    pub fn selected_box(&self) -> Option<&TextBox> {
        let id = self.session.selection.as_ref()?;
        self.doc.find_text_box(id).map(|(_, b)| b)
    }

    /// Current state in the persisted shape
    pub fn snapshot(&self) -> Snapshot {
        capture_state(&self.doc, self.session.active_page)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo() || self.debounce.is_pending()
    }

    pub fn can_redo(&self) -> bool {
        !self.debounce.is_pending() && self.history.can_redo()
    }

    pub fn has_pending_edit(&self) -> bool {
        self.debounce.is_pending()
    }

    // === History plumbing ===

    /// Capture the live document and push it, unless a rebuild is unsettled
    fn commit(&mut self) {
        if !self.restorer.admit_capture() {
            return;
        }
        self.history.push(capture_state(&self.doc, self.session.active_page));
        self.revision += 1;
        debug!(
            cursor = ?self.history.cursor(),
            entries = self.history.len(),
            "history entry pushed"
        );
    }

    /// Commit a debounced content edit as its own entry
    pub fn flush_pending(&mut self) -> bool {
        if self.debounce.take() {
            self.commit();
            true
        } else {
            false
        }
    }

    /// Drive the debounce timer; call once per event loop iteration
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.debounce.is_due(now) {
            self.flush_pending()
        } else {
            false
        }
    }

    /// Report that the frame following a restore has been drawn
    pub fn settle(&mut self) {
        if self.restorer.is_restoring() {
            self.restorer.settle();
        }
    }

    pub fn undo(&mut self) -> Result<bool, RestoreError> {
        self.flush_pending();
        self.cancel_gesture();
        let snapshot = match self.history.undo() {
            Some(snapshot) => snapshot.clone(),
            None => return Ok(false),
        };
        if let Err(e) = self.apply(&snapshot) {
            self.history.redo();
            return Err(e);
        }
        Ok(true)
    }

    pub fn redo(&mut self) -> Result<bool, RestoreError> {
        self.flush_pending();
        self.cancel_gesture();
        let snapshot = match self.history.redo() {
            Some(snapshot) => snapshot.clone(),
            None => return Ok(false),
        };
        if let Err(e) = self.apply(&snapshot) {
            self.history.undo();
            return Err(e);
        }
        Ok(true)
    }

    fn apply(&mut self, snapshot: &Snapshot) -> Result<(), RestoreError> {
        let outcome = self.restorer.restore(&mut self.doc, snapshot)?;
        self.session.active_page = outcome.active_page;
        self.session.selection = None;
        self.gesture = None;
        self.tracker.rebuild(&self.doc);
        if self.tracker.most_visible() != Some(outcome.active_page) {
            self.tracker.scroll_to_page(outcome.active_page);
        }
        self.ids.observe(&self.doc);
        self.revision += 1;
        Ok(())
    }

    // === Selection ===

    /// Select a box. Leaving a box with a pending edit commits that edit.
    pub fn select(&mut self, id: &TextBoxId) -> bool {
        let page = match self.doc.find_text_box(id) {
            Some((page, _)) => page,
            None => return false,
        };
        if !self.session.is_selected(id) {
            self.flush_pending();
        }
        self.session.selection = Some(id.clone());
        self.session.active_page = page;
        true
    }

    pub fn clear_selection(&mut self) {
        self.flush_pending();
        self.session.selection = None;
    }

    /// Move the selection to the next (or previous) box on the active page
    pub fn cycle_selection(&mut self, forward: bool) -> Option<TextBoxId> {
        let page = self.doc.page(self.session.active_page)?;
        if page.text_boxes.is_empty() {
            return None;
        }
        let count = page.text_boxes.len();
        let current = self
            .session
            .selection
            .as_ref()
            .and_then(|id| page.text_boxes.iter().position(|b| &b.id == id));
        let next = match (current, forward) {
            (None, true) => 0,
            (None, false) => count - 1,
            (Some(i), true) => (i + 1) % count,
            (Some(i), false) => (i + count - 1) % count,
        };
        let id = page.text_boxes[next].id.clone();
        self.select(&id);
        Some(id)
    }

    // === Text boxes ===

    /// Add a default box to the active page and select it
    pub fn add_text_box(&mut self) -> Option<TextBoxId> {
        self.add_text_box_with("")
    }

    /// Add a box already holding `content` (pasting with nothing selected)
    pub fn add_text_box_with(&mut self, content: &str) -> Option<TextBoxId> {
        self.flush_pending();
        let page = self.session.active_page;
        let paper = self.doc.page(page)?.color;

        let id = self.ids.next_id();
        let mut text_box = TextBox::new(id.clone(), paper, &self.session.font_family, self.session.font_size);
        text_box.content = content.to_string();
        if let Some((width, height)) = self.doc.page(page).map(|p| p.content_size()) {
            text_box.clamp_into(width, height);
        }
        if !self.doc.add_text_box(page, text_box) {
            return None;
        }

        self.session.selection = Some(id.clone());
        self.commit();
        info!(id = %id, page, "text box added");
        Some(id)
    }

    pub fn delete_selected(&mut self) -> bool {
        self.flush_pending();
        let id = match self.session.selection.take() {
            Some(id) => id,
            None => return false,
        };
        if self.gesture.as_ref().map(Gesture::id) == Some(&id) {
            self.gesture = None;
        }
        match self.doc.remove_text_box(&id) {
            Some(_) => {
                self.commit();
                info!(id = %id, "text box deleted");
                true
            }
            None => false,
        }
    }

    /// Apply a keystroke-level change to the selected box's content. The
    /// history entry is deferred until typing pauses or the box is left.
    pub fn edit_content<F>(&mut self, now: Instant, edit: F) -> bool
    where
        F: FnOnce(&mut String),
    {
        let id = match self.session.selection.clone() {
            Some(id) => id,
            None => return false,
        };
        let text_box = match self.doc.text_box_mut(&id) {
            Some(b) => b,
            None => return false,
        };
        let before = text_box.content.clone();
        edit(&mut text_box.content);
        if text_box.content == before {
            return false;
        }
        self.debounce.touch(now);
        true
    }

    /// Leave the box being edited (blur): commits any pending edit
    pub fn end_edit(&mut self) -> bool {
        self.flush_pending()
    }

    /// Insert pasted text at byte offset `at` of the selected box; one entry
    pub fn paste_content(&mut self, at: usize, text: &str) -> bool {
        if text.is_empty() {
            return false;
        }
        self.flush_pending();
        let id = match self.session.selection.clone() {
            Some(id) => id,
            None => return false,
        };
        let text_box = match self.doc.text_box_mut(&id) {
            Some(b) => b,
            None => return false,
        };
        let at = floor_char_boundary(&text_box.content, at);
        text_box.content.insert_str(at, text);
        self.commit();
        true
    }

    /// Remove the selected box's whole content and return it; one entry
    pub fn cut_content(&mut self) -> Option<String> {
        self.flush_pending();
        let id = self.session.selection.clone()?;
        let text_box = self.doc.text_box_mut(&id)?;
        if text_box.content.is_empty() {
            return None;
        }
        let taken = std::mem::take(&mut text_box.content);
        self.commit();
        Some(taken)
    }

    fn with_selected<F>(&mut self, change: F) -> bool
    where
        F: FnOnce(&mut TextBox) -> bool,
    {
        self.flush_pending();
        let id = match self.session.selection.clone() {
            Some(id) => id,
            None => return false,
        };
        let changed = match self.doc.text_box_mut(&id) {
            Some(text_box) => change(text_box),
            None => false,
        };
        if changed {
            self.commit();
        }
        changed
    }

    pub fn toggle_style(&mut self, flag: StyleFlag) -> bool {
        self.with_selected(|b| {
            let field = match flag {
                StyleFlag::Bold => &mut b.bold,
                StyleFlag::Italic => &mut b.italic,
                StyleFlag::Underline => &mut b.underline,
            };
            *field = !*field;
            true
        })
    }

    pub fn set_alignment(&mut self, align: TextAlign) -> bool {
        self.with_selected(|b| {
            if b.align == align {
                return false;
            }
            b.align = align;
            true
        })
    }

    /// Change the session font, and the selected box's font if any
    pub fn set_font_family(&mut self, family: &str) -> bool {
        let family = family.trim();
        if family.is_empty() {
            return false;
        }
        self.session.font_family = family.to_string();
        self.with_selected(|b| {
            if b.font_family == family {
                return false;
            }
            b.font_family = family.to_string();
            true
        })
    }

    /// Change the session font size, and the selected box's size if any
    pub fn set_font_size(&mut self, size: Px) -> bool {
        if size <= Px::ZERO {
            return false;
        }
        self.session.font_size = size;
        self.with_selected(|b| {
            if b.font_size == size {
                return false;
            }
            b.font_size = size;
            true
        })
    }

    // === Gestures ===

    pub fn begin_drag(&mut self, id: &TextBoxId, pointer: Pointer) -> bool {
        if !self.select(id) {
            return false;
        }
        let origin = match self.doc.find_text_box(id) {
            Some((_, b)) => b.rect(),
            None => return false,
        };
        self.gesture = Some(Gesture::Drag(DragGesture::begin(id.clone(), origin, pointer)));
        true
    }

    pub fn begin_resize(&mut self, id: &TextBoxId, handle: ResizeHandle, pointer: Pointer) -> bool {
        if !self.select(id) {
            return false;
        }
        let origin = match self.doc.find_text_box(id) {
            Some((_, b)) => b.rect(),
            None => return false,
        };
        self.gesture = Some(Gesture::Resize(ResizeGesture::begin(id.clone(), handle, origin, pointer)));
        true
    }

    /// Feed a pointer move to the active gesture, updating the box live
    pub fn update_gesture(&mut self, pointer: Pointer) -> bool {
        let gesture = match self.gesture.as_mut() {
            Some(g) => g,
            None => return false,
        };
        let container = match self.doc.container_of(gesture.id()) {
            Some(c) => c,
            None => {
                self.gesture = None;
                return false;
            }
        };
        let rect = match gesture {
            Gesture::Drag(g) => g.update(pointer, container),
            Gesture::Resize(g) => g.update(pointer, container),
        };
        let id = gesture.id().clone();
        match self.doc.text_box_mut(&id) {
            Some(b) => {
                b.set_rect(rect);
                true
            }
            None => false,
        }
    }

    /// Release the pointer. A drag only records history if the pointer
    /// moved; a resize always does.
    pub fn end_gesture(&mut self) -> bool {
        let gesture = match self.gesture.take() {
            Some(g) => g,
            None => return false,
        };
        let record = match &gesture {
            Gesture::Drag(g) => g.moved(),
            Gesture::Resize(_) => true,
        };
        if record {
            self.commit();
        }
        record
    }

    /// Abandon the gesture and put the box back where it started
    pub fn cancel_gesture(&mut self) {
        if let Some(gesture) = self.gesture.take() {
            let origin = gesture.origin();
            if let Some(b) = self.doc.text_box_mut(gesture.id()) {
                b.set_rect(origin);
            }
        }
    }

    // === Pages ===

    /// Insert a page after the active one and make it active
    pub fn add_page(&mut self) -> Option<usize> {
        self.flush_pending();
        let number = self.doc.insert_page_after(self.session.active_page)?;
        self.session.active_page = number;
        self.tracker.rebuild(&self.doc);
        self.tracker.scroll_to_page(number);
        self.commit();
        info!(page = number, pages = self.doc.page_count(), "page added");
        Some(number)
    }

    fn target_page(&self, page: Option<usize>) -> usize {
        page.unwrap_or(self.session.active_page)
    }

    pub fn set_page_color(&mut self, page: Option<usize>, color: PaperColor) -> bool {
        self.flush_pending();
        let number = self.target_page(page);
        let changed = match self.doc.page_mut(number) {
            Some(p) if p.color != color => {
                p.set_color(color);
                true
            }
            _ => false,
        };
        if changed {
            self.commit();
        }
        changed
    }

    pub fn set_page_size(&mut self, page: Option<usize>, size: PageSize) -> bool {
        self.flush_pending();
        let number = self.target_page(page);
        let changed = match self.doc.page_mut(number) {
            Some(p) if p.size != size => {
                p.set_size(size);
                true
            }
            _ => false,
        };
        if changed {
            self.tracker.rebuild(&self.doc);
            self.commit();
        }
        changed
    }

    // === Scrolling ===

    pub fn set_viewport(&mut self, height: f64) {
        self.tracker.set_viewport(height);
        self.follow_visibility();
    }

    pub fn scroll_by(&mut self, delta: f64) {
        self.tracker.scroll_by(delta);
        self.follow_visibility();
    }

    pub fn go_to_page(&mut self, number: usize) -> bool {
        if self.doc.page(number).is_none() {
            return false;
        }
        self.tracker.scroll_to_page(number);
        self.session.active_page = number;
        true
    }

    fn follow_visibility(&mut self) {
        if let Some(number) = self.tracker.most_visible() {
            self.session.active_page = number;
        }
    }
}

/// Largest char boundary not past `at`
pub fn floor_char_boundary(s: &str, at: usize) -> usize {
    let mut at = at.min(s.len());
    while !s.is_char_boundary(at) {
        at -= 1;
    }
    at
}
