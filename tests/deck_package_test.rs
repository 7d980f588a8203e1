//! Package writer and end-to-end renderer tests: the generated archive must
//! carry the expected OOXML parts, and file output must land under
//! uploads/pptx/ with a timestamped, sanitized name.

mod common;

use std::io::{Cursor, Read};

use common::*;
use deckbuilder::models::slide::ContentKind;
use deckbuilder::render::layout::build_deck;
use deckbuilder::render::pptx::deck_to_bytes;
use deckbuilder::render::style::StyleSheet;
use deckbuilder::render::{UploadImageResolver, render_deck, sanitize_title};
use tempfile::TempDir;

fn read_part(bytes: &[u8], name: &str) -> String {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("not a zip archive");
    let mut file = archive.by_name(name).unwrap_or_else(|_| panic!("missing part {name}"));
    let mut content = String::new();
    file.read_to_string(&mut content).expect("part not UTF-8");
    content
}

fn part_names(bytes: &[u8]) -> Vec<String> {
    let archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("not a zip archive");
    archive.file_names().map(String::from).collect()
}

#[test]
fn test_package_contains_required_parts() {
    let style = StyleSheet::default();
    let pres = presentation_fixture("Q1 Plan", "Overview");
    let slides = vec![
        slide_fixture(1, "Intro", "Hello\n\nWorld", ContentKind::Paragraph),
        slide_fixture(2, "", "A\nB\nC", ContentKind::Bullet),
    ];
    let deck = build_deck(&pres, &slides, &StubResolver(None), &style);

    let bytes = deck_to_bytes(&deck, &style).expect("package write failed");
    let names = part_names(&bytes);

    for required in [
        "[Content_Types].xml",
        "_rels/.rels",
        "ppt/presentation.xml",
        "ppt/_rels/presentation.xml.rels",
        "ppt/slideMasters/slideMaster1.xml",
        "ppt/slideLayouts/slideLayout1.xml",
        "ppt/theme/theme1.xml",
        "ppt/slides/slide1.xml",
        "ppt/slides/slide2.xml",
        "ppt/slides/slide3.xml",
    ] {
        assert!(names.iter().any(|n| n == required), "missing {required}");
    }
    assert!(!names.iter().any(|n| n == "ppt/slides/slide4.xml"));
}

#[test]
fn test_slide_parts_carry_text_and_footer() {
    let style = StyleSheet::default();
    let pres = presentation_fixture("Q1 Plan", "Overview");
    let slides = vec![
        slide_fixture(1, "Intro", "Hello\n\nWorld", ContentKind::Paragraph),
        slide_fixture(2, "", "A\nB\nC", ContentKind::Bullet),
    ];
    let deck = build_deck(&pres, &slides, &StubResolver(None), &style);
    let bytes = deck_to_bytes(&deck, &style).expect("package write failed");

    let title_slide = read_part(&bytes, "ppt/slides/slide1.xml");
    assert!(title_slide.contains("<a:t>Q1 PLAN</a:t>"));
    assert!(title_slide.contains("<a:t>Overview</a:t>"));

    let intro = read_part(&bytes, "ppt/slides/slide2.xml");
    assert!(intro.contains("<a:t>Hello</a:t>"));
    assert!(intro.contains("<a:t>World</a:t>"));
    assert!(intro.contains("<a:t>1 / 2</a:t>"));

    let bullets = read_part(&bytes, "ppt/slides/slide3.xml");
    assert!(bullets.contains("<a:t>Slide 2</a:t>"));
    assert!(bullets.contains("<a:t>C</a:t>"));
    assert!(bullets.contains("<a:t>2 / 2</a:t>"));
}

#[test]
fn test_text_is_xml_escaped() {
    let style = StyleSheet::default();
    let pres = presentation_fixture("R&D <Plans>", "");
    let deck = build_deck(&pres, &[], &StubResolver(None), &style);
    let bytes = deck_to_bytes(&deck, &style).expect("package write failed");

    let title_slide = read_part(&bytes, "ppt/slides/slide1.xml");
    assert!(title_slide.contains("R&amp;D &lt;PLANS&gt;"));
    assert!(!title_slide.contains("<a:t>R&D"));
}

#[test]
fn test_resolvable_image_is_embedded() {
    let style = StyleSheet::default();
    let dir = TempDir::new().expect("temp dir");
    std::fs::create_dir_all(dir.path().join("uploads/images")).expect("mkdir");
    let image_rel = "uploads/images/pic.png";
    std::fs::write(dir.path().join(image_rel), b"not-a-real-png-but-bytes").expect("write image");

    let pres = presentation_fixture("Deck", "");
    let mut slide = slide_fixture(1, "S", "text", ContentKind::Paragraph);
    slide.image_path = image_rel.to_string();

    let resolver = UploadImageResolver::new(dir.path());
    let deck = build_deck(&pres, &[slide], &resolver, &style);
    assert!(deck.pages[1].image.is_some());

    let bytes = deck_to_bytes(&deck, &style).expect("package write failed");
    let names = part_names(&bytes);
    assert!(names.iter().any(|n| n == "ppt/media/image1.png"));

    let rels = read_part(&bytes, "ppt/slides/_rels/slide2.xml.rels");
    assert!(rels.contains("Target=\"../media/image1.png\""));
    let slide_xml = read_part(&bytes, "ppt/slides/slide2.xml");
    assert!(slide_xml.contains("r:embed=\"rId2\""));
}

#[test]
fn test_unreadable_image_is_skipped_not_fatal() {
    let style = StyleSheet::default();
    let pres = presentation_fixture("Deck", "");
    let mut slide = slide_fixture(1, "S", "text", ContentKind::Paragraph);
    slide.image_path = "uploads/images/gone.png".to_string();

    // Resolver claims the path exists but nothing is on disk.
    let resolver = StubResolver(Some("does/not/exist.png".into()));
    let deck = build_deck(&pres, &[slide], &resolver, &style);

    let bytes = deck_to_bytes(&deck, &style).expect("package write failed");
    let names = part_names(&bytes);
    assert!(!names.iter().any(|n| n.starts_with("ppt/media/")));
    let slide_xml = read_part(&bytes, "ppt/slides/slide2.xml");
    assert!(!slide_xml.contains("<p:pic>"));
    assert!(slide_xml.contains("<a:t>text</a:t>"));
}

#[test]
fn test_render_deck_writes_relative_path() {
    let dir = TempDir::new().expect("temp dir");
    let pres = presentation_fixture("Q1 Plan: Draft!", "");
    let slides = vec![slide_fixture(1, "Intro", "Hello", ContentKind::Paragraph)];

    let path = render_deck(&pres, &slides, &StubResolver(None), &StyleSheet::default(), dir.path())
        .expect("render failed");

    assert!(path.starts_with("uploads/pptx/"));
    assert!(path.ends_with("_Q1_Plan__Draft_.pptx"));
    let written = dir.path().join(&path);
    assert!(written.is_file());
    assert!(std::fs::metadata(written).expect("stat").len() > 0);
}

#[test]
fn test_sanitize_title() {
    assert_eq!(sanitize_title("Q1 Plan"), "Q1_Plan");
    assert_eq!(sanitize_title("a/b\\c:d"), "a_b_c_d");
    assert_eq!(sanitize_title("safe_Name-42"), "safe_Name-42");
}
