//! Rebuilding the live document from a snapshot
//!
//! Restoration is atomic: the replacement document is built completely from
//! the snapshot before anything live is touched, so a malformed snapshot
//! fails without side effects. While a rebuild is unsettled the restorer sits
//! in [`RestoreState::Restoring`] and capture requests are rejected.

use std::collections::HashSet;

use thiserror::Error;
use tracing::{debug, info};

use crate::document::{Document, Page, Px, TextAlign, TextBox, TextBoxId};

use super::snapshot::{
    PageSnapshot, Snapshot, TextBoxSnapshot, DECORATION_NONE, DECORATION_UNDERLINE,
    STYLE_ITALIC, STYLE_NORMAL, WEIGHT_BOLD, WEIGHT_NORMAL,
};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RestoreError {
    #[error("snapshot contains no pages")]
    NoPages,

    #[error("snapshot declares {declared} pages but contains {actual}")]
    PageCount { declared: usize, actual: usize },

    #[error("page {found} is out of order (expected page {expected})")]
    PageNumber { expected: usize, found: usize },

    #[error("text box on page {page} has no id")]
    MissingId { page: usize },

    #[error("text box id {0} appears more than once")]
    DuplicateId(String),

    #[error("text box {id} on page {page}: invalid {field} '{value}'")]
    InvalidField {
        page: usize,
        id: String,
        field: &'static str,
        value: String,
    },
}

/// Re-entrancy state of the history mechanism
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RestoreState {
    #[default]
    Idle,
    /// A rebuild happened and has not settled yet
    Restoring,
}

/// What the caller has to re-sync after a successful restore
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestoreOutcome {
    pub page_count: usize,
    pub active_page: usize,
}

#[derive(Debug, Default)]
pub struct Restorer {
    state: RestoreState,
    rejected: usize,
}

impl Restorer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> RestoreState {
        self.state
    }

    pub fn is_restoring(&self) -> bool {
        self.state == RestoreState::Restoring
    }

    /// Number of capture requests turned away while restoring
    pub fn rejected_captures(&self) -> usize {
        self.rejected
    }

    /// Gate checked at the top of every capture. Requests made while a
    /// rebuild is unsettled are dropped, not queued.
    pub fn admit_capture(&mut self) -> bool {
        if self.is_restoring() {
            self.rejected += 1;
            debug!(rejected = self.rejected, "capture suppressed during restore");
            return false;
        }
        true
    }

    /// Replace `doc` with a reconstruction of `snapshot`.
    ///
    /// On error `doc` is untouched and the state is unchanged.
    pub fn restore(
        &mut self,
        doc: &mut Document,
        snapshot: &Snapshot,
    ) -> Result<RestoreOutcome, RestoreError> {
        let rebuilt = rebuild(snapshot)?;

        self.state = RestoreState::Restoring;
        *doc = rebuilt;

        let page_count = doc.page_count();
        let active_page = snapshot.active_page.clamp(1, page_count);
        info!(
            pages = page_count,
            boxes = doc.text_box_count(),
            active_page,
            "document restored"
        );

        Ok(RestoreOutcome {
            page_count,
            active_page,
        })
    }

    /// The rebuilt tree has been drawn; accept captures again
    pub fn settle(&mut self) {
        if self.is_restoring() {
            debug!("restore settled");
        }
        self.state = RestoreState::Idle;
    }
}

/// Build a fresh document from a snapshot without touching anything live.
/// Every stored field is required and parsed strictly.
pub fn rebuild(snapshot: &Snapshot) -> Result<Document, RestoreError> {
    if snapshot.pages.is_empty() {
        return Err(RestoreError::NoPages);
    }
    if snapshot.page_count != snapshot.pages.len() {
        return Err(RestoreError::PageCount {
            declared: snapshot.page_count,
            actual: snapshot.pages.len(),
        });
    }

    let mut seen = HashSet::new();
    let mut pages = Vec::with_capacity(snapshot.pages.len());

    for (idx, page_snapshot) in snapshot.pages.iter().enumerate() {
        if page_snapshot.number != idx + 1 {
            return Err(RestoreError::PageNumber {
                expected: idx + 1,
                found: page_snapshot.number,
            });
        }
        pages.push(rebuild_page(page_snapshot, &mut seen)?);
    }

    Ok(Document::from_pages(pages))
}

fn rebuild_page(
    snapshot: &PageSnapshot,
    seen: &mut HashSet<String>,
) -> Result<Page, RestoreError> {
    let mut page = Page::new(snapshot.number, snapshot.color, snapshot.size);
    for box_snapshot in &snapshot.text_boxes {
        if box_snapshot.id.trim().is_empty() {
            return Err(RestoreError::MissingId {
                page: snapshot.number,
            });
        }
        if !seen.insert(box_snapshot.id.clone()) {
            return Err(RestoreError::DuplicateId(box_snapshot.id.clone()));
        }
        let mut text_box = rebuild_text_box(snapshot.number, box_snapshot)?;
        // paper always mirrors the owning page
        text_box.paper = snapshot.color;
        page.text_boxes.push(text_box);
    }
    Ok(page)
}

fn rebuild_text_box(page: usize, s: &TextBoxSnapshot) -> Result<TextBox, RestoreError> {
    let invalid = |field: &'static str, value: &str| RestoreError::InvalidField {
        page,
        id: s.id.clone(),
        field,
        value: value.to_string(),
    };

    let px = |field: &'static str, value: &str| -> Result<Px, RestoreError> {
        value.parse::<Px>().map_err(|_| invalid(field, value))
    };

    let width = px("width", &s.width)?;
    let height = px("height", &s.height)?;
    let font_size = px("fontSize", &s.font_size)?;
    if width.value() <= 0.0 {
        return Err(invalid("width", &s.width));
    }
    if height.value() <= 0.0 {
        return Err(invalid("height", &s.height));
    }
    if font_size.value() <= 0.0 {
        return Err(invalid("fontSize", &s.font_size));
    }

    let bold = match s.font_weight.as_str() {
        WEIGHT_BOLD => true,
        WEIGHT_NORMAL => false,
        other => return Err(invalid("fontWeight", other)),
    };
    let italic = match s.font_style.as_str() {
        STYLE_ITALIC => true,
        STYLE_NORMAL => false,
        other => return Err(invalid("fontStyle", other)),
    };
    let underline = match s.text_decoration.as_str() {
        DECORATION_UNDERLINE => true,
        DECORATION_NONE => false,
        other => return Err(invalid("textDecoration", other)),
    };
    let align = s
        .text_align
        .parse::<TextAlign>()
        .map_err(|_| invalid("textAlign", &s.text_align))?;

    if s.font_family.trim().is_empty() {
        return Err(invalid("fontFamily", &s.font_family));
    }

    Ok(TextBox {
        id: TextBoxId::new(s.id.clone()),
        left: px("left", &s.left)?,
        top: px("top", &s.top)?,
        width,
        height,
        content: s.content.clone(),
        font_family: s.font_family.clone(),
        font_size,
        bold,
        italic,
        underline,
        align,
        paper: s.paper,
    })
}
