//! Layout engine tests — page structure, text flow, truncation, and the
//! image split layout, all on the pure geometry model.

mod common;

use std::path::PathBuf;

use common::*;
use deckbuilder::models::slide::{ContentKind, ImagePosition};
use deckbuilder::render::layout::{self, Align, Page, TextFrame};
use deckbuilder::render::style::StyleSheet;

/// Text frames holding slide body content: everything between the header
/// title (first) and the footer counter (last).
fn body_frames(page: &Page) -> &[TextFrame] {
    &page.texts[1..page.texts.len() - 1]
}

fn footer_text(page: &Page) -> &str {
    &page.texts.last().expect("no texts on page").runs[0].text
}

#[test]
fn test_deck_has_one_page_per_slide_plus_title() {
    let style = StyleSheet::default();
    let pres = presentation_fixture("Roadmap", "");
    let slides = vec![
        slide_fixture(1, "One", "a", ContentKind::Paragraph),
        slide_fixture(2, "Two", "b", ContentKind::Paragraph),
        slide_fixture(3, "Three", "c", ContentKind::Bullet),
    ];

    let deck = layout::build_deck(&pres, &slides, &StubResolver(None), &style);

    assert_eq!(deck.pages.len(), 4);
    assert_eq!(deck.title, "Roadmap");
}

#[test]
fn test_title_slide_uppercases_heading() {
    let style = StyleSheet::default();
    let pres = presentation_fixture("Quarterly review", "All teams");

    let deck = layout::build_deck(&pres, &[], &StubResolver(None), &style);

    let title_page = &deck.pages[0];
    assert_eq!(title_page.texts[0].runs[0].text, "QUARTERLY REVIEW");
    assert!(title_page.texts[0].runs[0].bold);
    assert_eq!(title_page.texts[0].align, Align::Center);
    // Heading, description, caption
    assert_eq!(title_page.texts.len(), 3);
    assert_eq!(title_page.texts[1].runs[0].text, "All teams");
}

#[test]
fn test_title_slide_omits_blank_description() {
    let style = StyleSheet::default();
    let pres = presentation_fixture("Deck", "   ");

    let deck = layout::build_deck(&pres, &[], &StubResolver(None), &style);

    // Heading and caption only
    assert_eq!(deck.pages[0].texts.len(), 2);
}

#[test]
fn test_empty_slide_title_falls_back_to_ordinal() {
    let style = StyleSheet::default();
    let pres = presentation_fixture("Deck", "");
    let slides = vec![
        slide_fixture(1, "Intro", "x", ContentKind::Paragraph),
        slide_fixture(2, "  ", "y", ContentKind::Paragraph),
    ];

    let deck = layout::build_deck(&pres, &slides, &StubResolver(None), &style);

    assert_eq!(deck.pages[1].texts[0].runs[0].text, "Intro");
    assert_eq!(deck.pages[2].texts[0].runs[0].text, "Slide 2");
}

#[test]
fn test_paragraph_splitting() {
    let paragraphs = layout::split_paragraphs("Hello\nthere\n\n  \n\nSecond block\n\nThird");
    assert_eq!(paragraphs, vec!["Hello there", "Second block", "Third"]);

    // Re-splitting the rendered blocks by the same rule is a fixpoint.
    let rejoined = paragraphs.join("\n\n");
    assert_eq!(layout::split_paragraphs(&rejoined), paragraphs);
}

#[test]
fn test_bullet_lines_trimmed_and_empties_dropped() {
    let lines = layout::split_bullet_lines("  first \n\n second\n   \nthird");
    assert_eq!(lines, vec!["first", "second", "third"]);
}

#[test]
fn test_paragraph_overflow_truncates() {
    let style = StyleSheet::default();
    let pres = presentation_fixture("Deck", "");
    let content = (1..=10)
        .map(|i| format!("Paragraph {i}"))
        .collect::<Vec<_>>()
        .join("\n\n");
    let slides = vec![slide_fixture(1, "Long", &content, ContentKind::Paragraph)];

    let deck = layout::build_deck(&pres, &slides, &StubResolver(None), &style);

    let frames = body_frames(&deck.pages[1]);
    assert!(frames.len() < 10);
    for frame in frames {
        assert!(frame.frame.y <= style.metrics.overflow_limit);
    }
    // First block is kept verbatim
    assert_eq!(frames[0].runs[0].text, "Paragraph 1");
}

#[test]
fn test_bullet_overflow_truncates_per_line() {
    let style = StyleSheet::default();
    let pres = presentation_fixture("Deck", "");
    let content = (1..=20)
        .map(|i| format!("Item {i}"))
        .collect::<Vec<_>>()
        .join("\n");
    let slides = vec![slide_fixture(1, "Long", &content, ContentKind::Bullet)];

    let deck = layout::build_deck(&pres, &slides, &StubResolver(None), &style);

    let frames = body_frames(&deck.pages[1]);
    assert!(frames.len() < 20);
    assert!(frames.len() > 5); // bullets flow denser than paragraphs
    for frame in frames {
        assert!(frame.frame.y <= style.metrics.overflow_limit);
    }
}

#[test]
fn test_image_layout_flip_swaps_offsets() {
    let style = StyleSheet::default();
    let pres = presentation_fixture("Deck", "");
    let resolver = StubResolver(Some(PathBuf::from("uploads/images/pic.png")));

    let mut right = slide_fixture(1, "S", "text", ContentKind::Paragraph);
    right.image_path = "uploads/images/pic.png".to_string();
    right.image_position = ImagePosition::Right;

    let mut left = right.clone();
    left.image_position = ImagePosition::Left;

    let deck_r = layout::build_deck(&pres, &[right], &resolver, &style);
    let deck_l = layout::build_deck(&pres, &[left], &resolver, &style);

    let frame_r = &body_frames(&deck_r.pages[1])[0].frame;
    let frame_l = &body_frames(&deck_l.pages[1])[0].frame;
    let image_r = deck_r.pages[1].image.as_ref().expect("image missing");
    let image_l = deck_l.pages[1].image.as_ref().expect("image missing");

    // Content width identical in both cases, offsets swapped with the image
    assert_eq!(frame_r.w, frame_l.w);
    assert!(frame_r.x < image_r.frame.x);
    assert!(frame_l.x > image_l.frame.x);
    assert_eq!(frame_r.x, image_l.frame.x);
    assert_eq!(frame_l.x, style.metrics.swapped_content_x);
    assert_eq!(image_r.frame.w, image_l.frame.w);
}

#[test]
fn test_unresolvable_image_keeps_full_width() {
    let style = StyleSheet::default();
    let pres = presentation_fixture("Deck", "");
    let mut slide = slide_fixture(1, "S", "text", ContentKind::Paragraph);
    slide.image_path = "uploads/images/gone.png".to_string();

    let deck = layout::build_deck(&pres, &[slide], &StubResolver(None), &style);

    let page = &deck.pages[1];
    assert!(page.image.is_none());
    assert_eq!(
        body_frames(page)[0].frame.w,
        style.metrics.full_content_width
    );
}

#[test]
fn test_footer_counts_content_slides_only() {
    let style = StyleSheet::default();
    let pres = presentation_fixture("Deck", "");
    let slides = vec![
        slide_fixture(1, "A", "x", ContentKind::Paragraph),
        slide_fixture(2, "B", "y", ContentKind::Paragraph),
    ];

    let deck = layout::build_deck(&pres, &slides, &StubResolver(None), &style);

    assert_eq!(footer_text(&deck.pages[1]), "1 / 2");
    assert_eq!(footer_text(&deck.pages[2]), "2 / 2");
}

#[test]
fn test_example_deck_end_to_end() {
    let style = StyleSheet::default();
    let pres = presentation_fixture("Q1 Plan", "Overview");
    let slides = vec![
        slide_fixture(1, "Intro", "Hello\n\nWorld", ContentKind::Paragraph),
        slide_fixture(2, "", "A\nB\nC", ContentKind::Bullet),
    ];

    let deck = layout::build_deck(&pres, &slides, &StubResolver(None), &style);

    assert_eq!(deck.pages.len(), 3);
    assert_eq!(deck.pages[0].texts[0].runs[0].text, "Q1 PLAN");

    let intro = body_frames(&deck.pages[1]);
    assert_eq!(intro.len(), 2);
    assert_eq!(intro[0].runs[0].text, "Hello");
    assert_eq!(intro[1].runs[0].text, "World");
    assert!(intro[0].frame.y < intro[1].frame.y);

    let bullets_page = &deck.pages[2];
    assert_eq!(bullets_page.texts[0].runs[0].text, "Slide 2");
    let bullets = body_frames(bullets_page);
    assert_eq!(bullets.len(), 3);
    for (frame, expected) in bullets.iter().zip(["A", "B", "C"]) {
        assert_eq!(frame.runs.len(), 2);
        assert_eq!(frame.runs[0].text, "\u{2022} ");
        assert!(frame.runs[0].bold);
        assert_eq!(frame.runs[1].text, expected);
    }
    assert_eq!(footer_text(bullets_page), "2 / 2");
}

#[test]
fn test_empty_content_renders_no_body_frames() {
    let style = StyleSheet::default();
    let pres = presentation_fixture("Deck", "");
    let slides = vec![slide_fixture(1, "Empty", "   \n\n ", ContentKind::Paragraph)];

    let deck = layout::build_deck(&pres, &slides, &StubResolver(None), &style);

    assert!(body_frames(&deck.pages[1]).is_empty());
}
