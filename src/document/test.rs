use super::*;

fn make_box(id: &str) -> TextBox {
    TextBox::new(TextBoxId::new(id), PaperColor::Default, "Arial", Px(14.0))
}

#[test]
fn test_new_document_has_one_page() {
    let doc = Document::new(PageSize::A4, PaperColor::Default);
    assert_eq!(doc.page_count(), 1);
    assert_eq!(doc.pages()[0].number, 1);
    assert_eq!(doc.text_box_count(), 0);
}

#[test]
fn test_insert_page_after_inherits_and_renumbers() {
    let mut doc = Document::new(PageSize::Letter, PaperColor::Inverted);
    doc.insert_page_after(1).unwrap();
    doc.page_mut(1).unwrap().set_size(PageSize::A3);

    // insert between page 1 and page 2
    assert_eq!(doc.insert_page_after(1), Some(2));
    assert_eq!(doc.page_count(), 3);

    let numbers: Vec<usize> = doc.pages().iter().map(|p| p.number).collect();
    assert_eq!(numbers, vec![1, 2, 3]);
    assert_eq!(doc.page(2).unwrap().size, PageSize::A3);
    assert_eq!(doc.page(2).unwrap().color, PaperColor::Inverted);
    assert_eq!(doc.page(3).unwrap().size, PageSize::Letter);
}

#[test]
fn test_insert_page_after_missing_page() {
    let mut doc = Document::new(PageSize::A4, PaperColor::Default);
    assert_eq!(doc.insert_page_after(5), None);
    assert_eq!(doc.page_count(), 1);
}

#[test]
fn test_page_lookup_is_one_based() {
    let doc = Document::new(PageSize::A4, PaperColor::Default);
    assert!(doc.page(0).is_none());
    assert!(doc.page(1).is_some());
    assert!(doc.page(2).is_none());
}

#[test]
fn test_add_text_box_takes_page_color() {
    let mut doc = Document::new(PageSize::A4, PaperColor::Inverted);
    assert!(doc.add_text_box(1, make_box("a")));
    let (page, b) = doc.find_text_box(&TextBoxId::new("a")).unwrap();
    assert_eq!(page, 1);
    assert_eq!(b.paper, PaperColor::Inverted);
    assert!(!doc.add_text_box(2, make_box("b")));
}

#[test]
fn test_set_color_retags_boxes() {
    let mut doc = Document::new(PageSize::A4, PaperColor::Default);
    doc.add_text_box(1, make_box("a"));
    doc.add_text_box(1, make_box("b"));

    doc.page_mut(1).unwrap().set_color(PaperColor::Inverted);

    for b in &doc.page(1).unwrap().text_boxes {
        assert_eq!(b.paper, PaperColor::Inverted);
    }
}

#[test]
fn test_set_size_clamps_boxes() {
    let mut doc = Document::new(PageSize::A3, PaperColor::Default);
    let mut b = make_box("a");
    b.left = Px(1000.0);
    b.top = Px(1400.0);
    doc.add_text_box(1, b);

    doc.page_mut(1).unwrap().set_size(PageSize::A4);

    let b = &doc.page(1).unwrap().text_boxes[0];
    assert_eq!(b.left, Px(794.0 - 300.0));
    assert_eq!(b.top, Px(1123.0 - 100.0));
    assert_eq!(b.width, Px(300.0));
}

#[test]
fn test_clamp_into_oversized_box_pins_at_origin() {
    let mut b = make_box("a");
    b.left = Px(20.0);
    b.width = Px(900.0);
    b.clamp_into(Px(794.0), Px(1123.0));
    assert_eq!(b.left, Px::ZERO);
    assert_eq!(b.top, Px(50.0));
}

#[test]
fn test_remove_text_box() {
    let mut doc = Document::new(PageSize::A4, PaperColor::Default);
    doc.insert_page_after(1);
    doc.add_text_box(2, make_box("a"));

    let removed = doc.remove_text_box(&TextBoxId::new("a")).unwrap();
    assert_eq!(removed.id.as_str(), "a");
    assert_eq!(doc.text_box_count(), 0);
    assert!(doc.remove_text_box(&TextBoxId::new("a")).is_none());
}

#[test]
fn test_container_of() {
    let mut doc = Document::new(PageSize::Legal, PaperColor::Default);
    doc.add_text_box(1, make_box("a"));
    assert_eq!(
        doc.container_of(&TextBoxId::new("a")),
        Some((Px(816.0), Px(1344.0)))
    );
    assert_eq!(doc.container_of(&TextBoxId::new("zzz")), None);
}

#[test]
fn test_px_parse_and_display() {
    assert_eq!("50px".parse::<Px>(), Ok(Px(50.0)));
    assert_eq!(" 12.5px ".parse::<Px>(), Ok(Px(12.5)));
    assert_eq!("-4px".parse::<Px>(), Ok(Px(-4.0)));
    assert!("50".parse::<Px>().is_err());
    assert!("px".parse::<Px>().is_err());
    assert!("12em".parse::<Px>().is_err());

    assert_eq!(Px(50.0).to_string(), "50px");
    assert_eq!(Px(12.5).to_string(), "12.5px");
}

#[test]
fn test_enum_parsing() {
    assert_eq!("A4".parse::<PageSize>(), Ok(PageSize::A4));
    assert_eq!("legal".parse::<PageSize>(), Ok(PageSize::Legal));
    assert!("tabloid".parse::<PageSize>().is_err());
    assert_eq!("inverted".parse::<PaperColor>(), Ok(PaperColor::Inverted));
    assert_eq!("justify".parse::<TextAlign>(), Ok(TextAlign::Justify));
    assert!("middle".parse::<TextAlign>().is_err());
}

#[test]
fn test_rect_contains() {
    let r = Rect::new(10.0, 10.0, 100.0, 40.0);
    assert!(r.contains(Px(10.0), Px(10.0)));
    assert!(r.contains(Px(109.0), Px(49.0)));
    assert!(!r.contains(Px(110.0), Px(20.0)));
    assert!(!r.contains(Px(5.0), Px(20.0)));
}
