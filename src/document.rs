pub mod page;
pub mod textbox;
pub mod units;

#[cfg(test)]
mod test;

pub use page::{Page, PageSize, PaperColor};
pub use textbox::{TextAlign, TextBox, TextBoxId};
pub use units::{Px, Rect};

/// The live tree of pages and text boxes.
///
/// Pure data: nothing here knows about drawing, hit-testing or history.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pages: Vec<Page>,
}

impl Document {
    /// A document with a single empty page
    pub fn new(size: PageSize, color: PaperColor) -> Self {
        Self {
            pages: vec![Page::new(1, color, size)],
        }
    }

    /// Build from already-numbered pages (used by restoration)
    pub fn from_pages(pages: Vec<Page>) -> Self {
        debug_assert!(
            pages.iter().enumerate().all(|(i, p)| p.number == i + 1),
            "page numbers must be contiguous and 1-based"
        );
        Self { pages }
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn page(&self, number: usize) -> Option<&Page> {
        number.checked_sub(1).and_then(|idx| self.pages.get(idx))
    }

    pub fn page_mut(&mut self, number: usize) -> Option<&mut Page> {
        number.checked_sub(1).and_then(|idx| self.pages.get_mut(idx))
    }

    /// Insert a page right after `after`, inheriting its color and size.
    /// Returns the new page's number.
    pub fn insert_page_after(&mut self, after: usize) -> Option<usize> {
        let source = self.page(after)?;
        let page = Page::new(after + 1, source.color, source.size);
        self.pages.insert(after, page);
        self.renumber();
        Some(after + 1)
    }

    fn renumber(&mut self) {
        for (i, page) in self.pages.iter_mut().enumerate() {
            page.number = i + 1;
        }
    }

    /// Append a box to a page, tagging it with the page's paper color
    pub fn add_text_box(&mut self, page_number: usize, mut text_box: TextBox) -> bool {
        match self.page_mut(page_number) {
            Some(page) => {
                text_box.paper = page.color;
                page.text_boxes.push(text_box);
                true
            }
            None => false,
        }
    }

    /// Find a box and the number of the page that owns it
    pub fn find_text_box(&self, id: &TextBoxId) -> Option<(usize, &TextBox)> {
        self.pages.iter().find_map(|page| {
            page.text_boxes
                .iter()
                .find(|b| &b.id == id)
                .map(|b| (page.number, b))
        })
    }

    pub fn text_box_mut(&mut self, id: &TextBoxId) -> Option<&mut TextBox> {
        self.pages
            .iter_mut()
            .flat_map(|page| page.text_boxes.iter_mut())
            .find(|b| &b.id == id)
    }

    pub fn remove_text_box(&mut self, id: &TextBoxId) -> Option<TextBox> {
        for page in self.pages.iter_mut() {
            if let Some(idx) = page.text_boxes.iter().position(|b| &b.id == id) {
                return Some(page.text_boxes.remove(idx));
            }
        }
        None
    }

    /// Content area of the page that owns `id`
    pub fn container_of(&self, id: &TextBoxId) -> Option<(Px, Px)> {
        let (number, _) = self.find_text_box(id)?;
        self.page(number).map(Page::content_size)
    }

    pub fn text_box_count(&self) -> usize {
        self.pages.iter().map(|p| p.text_boxes.len()).sum()
    }
}
