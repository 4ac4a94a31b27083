use std::time::{SystemTime, UNIX_EPOCH};

use crate::document::{Document, Px, TextBoxId};

/// Editing context shared by every operation on the document
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    /// Font family given to new boxes
    pub font_family: String,
    /// Font size given to new boxes
    pub font_size: Px,
    pub selection: Option<TextBoxId>,
    /// 1-based number of the page new boxes and pages are added relative to
    pub active_page: usize,
}

impl Session {
    pub fn new(font_family: impl Into<String>, font_size: Px) -> Self {
        Self {
            font_family: font_family.into(),
            font_size,
            selection: None,
            active_page: 1,
        }
    }

    pub fn is_selected(&self, id: &TextBoxId) -> bool {
        self.selection.as_ref() == Some(id)
    }
}

/// Hands out text box ids: epoch milliseconds, strictly increasing within a
/// session even when several boxes are created in the same millisecond.
/// Once `u64::MAX` has been seen, ids continue as `<u64::MAX>-<n>`.
#[derive(Debug, Default)]
pub struct IdGenerator {
    last: u64,
    spill: u64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> TextBoxId {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        match self.last.checked_add(1) {
            Some(next) => {
                self.last = now.max(next);
                TextBoxId::new(self.last.to_string())
            }
            None => {
                self.spill = self.spill.saturating_add(1);
                TextBoxId::new(format!("{}-{}", self.last, self.spill))
            }
        }
    }

    /// Make sure future ids never collide with numeric ids already in `doc`
    pub fn observe(&mut self, doc: &Document) {
        let highest = doc
            .pages()
            .iter()
            .flat_map(|p| p.text_boxes.iter())
            .filter_map(|b| b.id.as_str().parse::<u64>().ok())
            .max();
        if let Some(highest) = highest {
            self.last = self.last.max(highest);
        }

        let spill_prefix = format!("{}-", u64::MAX);
        let highest_spill = doc
            .pages()
            .iter()
            .flat_map(|p| p.text_boxes.iter())
            .filter_map(|b| b.id.as_str().strip_prefix(spill_prefix.as_str()))
            .filter_map(|n| n.parse::<u64>().ok())
            .max();
        if let Some(n) = highest_spill {
            self.spill = self.spill.max(n);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{PageSize, PaperColor, TextBox};

    #[test]
    fn test_ids_are_unique_and_increasing() {
        let mut ids = IdGenerator::new();
        let a: u64 = ids.next_id().as_str().parse().unwrap();
        let b: u64 = ids.next_id().as_str().parse().unwrap();
        let c: u64 = ids.next_id().as_str().parse().unwrap();
        assert!(a < b && b < c);
    }

    #[test]
    fn test_observe_skips_past_existing_ids() {
        let mut doc = Document::new(PageSize::A4, PaperColor::Default);
        let far_future = "99999999999999";
        doc.add_text_box(1, TextBox::new(TextBoxId::new(far_future), PaperColor::Default, "Arial", Px(14.0)));

        let mut ids = IdGenerator::new();
        ids.observe(&doc);
        assert_eq!(ids.next_id().as_str(), "100000000000000");
    }

    #[test]
    fn test_ids_past_u64_max_get_a_suffix() {
        let mut doc = Document::new(PageSize::A4, PaperColor::Default);
        let max = u64::MAX.to_string();
        doc.add_text_box(1, TextBox::new(TextBoxId::new(max.as_str()), PaperColor::Default, "Arial", Px(14.0)));
        doc.add_text_box(1, TextBox::new(TextBoxId::new(format!("{}-4", max)), PaperColor::Default, "Arial", Px(14.0)));

        let mut ids = IdGenerator::new();
        ids.observe(&doc);
        assert_eq!(ids.next_id().as_str(), format!("{}-5", max));
        assert_eq!(ids.next_id().as_str(), format!("{}-6", max));
    }
}
