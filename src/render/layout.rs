//! Pure layout engine: walks the presentation and its ordered slides and
//! produces a geometry-only page model. No filesystem access beyond asking
//! the image resolver whether a referenced image exists, and no knowledge of
//! the output file format.

use std::path::PathBuf;

use crate::models::presentation::Presentation;
use crate::models::slide::{ContentKind, ImagePosition, Slide};

use super::ImageResolver;
use super::style::{Color, StyleSheet};

/// Caption on the bottom of the title slide.
const TITLE_CAPTION: &str = "Created with Deck Builder";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// Vertical anchoring of text inside its frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Top,
    Middle,
}

/// One styled run inside a text frame. Frames with multiple runs render the
/// runs inline (bullet glyph + line text).
#[derive(Debug, Clone)]
pub struct TextRun {
    pub text: String,
    pub size: f32,
    pub bold: bool,
    pub color: Color,
}

#[derive(Debug, Clone)]
pub struct TextFrame {
    pub frame: Rect,
    pub align: Align,
    pub anchor: Anchor,
    pub runs: Vec<TextRun>,
}

/// A filled rectangle with no outline (bars, stripes).
#[derive(Debug, Clone)]
pub struct Shape {
    pub frame: Rect,
    pub fill: Color,
}

#[derive(Debug, Clone)]
pub struct ImageFrame {
    pub frame: Rect,
    pub path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct Page {
    pub background: Color,
    pub shapes: Vec<Shape>,
    pub texts: Vec<TextFrame>,
    pub image: Option<ImageFrame>,
}

#[derive(Debug, Clone)]
pub struct Deck {
    pub title: String,
    pub pages: Vec<Page>,
}

/// Build the full deck: one title page followed by one page per slide in
/// ordinal order.
pub fn build_deck(
    presentation: &Presentation,
    slides: &[Slide],
    images: &dyn ImageResolver,
    style: &StyleSheet,
) -> Deck {
    let mut pages = Vec::with_capacity(slides.len() + 1);
    pages.push(title_page(presentation, style));
    for (i, slide) in slides.iter().enumerate() {
        pages.push(content_page(slide, i, slides.len(), images, style));
    }
    Deck {
        title: presentation.title.clone(),
        pages,
    }
}

fn title_page(presentation: &Presentation, style: &StyleSheet) -> Page {
    let m = &style.metrics;
    let p = &style.palette;
    let text_width = m.page_width - 2.0 * m.title_margin_x;

    let mut page = Page {
        background: p.white,
        shapes: vec![Shape {
            frame: Rect { x: 0.0, y: 0.0, w: m.page_width, h: m.title_bar_height },
            fill: p.accent,
        }],
        texts: Vec::new(),
        image: None,
    };

    page.texts.push(TextFrame {
        frame: Rect {
            x: m.title_margin_x,
            y: m.title_text_top,
            w: text_width,
            h: m.title_text_height,
        },
        align: Align::Center,
        anchor: Anchor::Middle,
        runs: vec![TextRun {
            text: presentation.title.to_uppercase(),
            size: style.sizes.deck_title,
            bold: true,
            color: p.white,
        }],
    });

    if !presentation.description.trim().is_empty() {
        page.texts.push(TextFrame {
            frame: Rect {
                x: m.title_margin_x,
                y: m.description_top,
                w: text_width,
                h: m.description_height,
            },
            align: Align::Center,
            anchor: Anchor::Top,
            runs: vec![TextRun {
                text: presentation.description.clone(),
                size: style.sizes.description,
                bold: false,
                color: p.dark_text,
            }],
        });
    }

    page.texts.push(TextFrame {
        frame: Rect {
            x: m.title_margin_x,
            y: m.caption_top,
            w: text_width,
            h: m.caption_height,
        },
        align: Align::Center,
        anchor: Anchor::Top,
        runs: vec![TextRun {
            text: TITLE_CAPTION.to_string(),
            size: style.sizes.caption,
            bold: false,
            color: p.muted,
        }],
    });

    page
}

fn content_page(
    slide: &Slide,
    index: usize,
    total: usize,
    images: &dyn ImageResolver,
    style: &StyleSheet,
) -> Page {
    let m = &style.metrics;
    let p = &style.palette;

    let mut page = Page {
        background: p.white,
        shapes: Vec::new(),
        texts: Vec::new(),
        image: None,
    };

    // Header bar with the accent stripe at its left edge.
    page.shapes.push(Shape {
        frame: Rect { x: 0.0, y: 0.0, w: m.page_width, h: m.header_height },
        fill: p.light_gray,
    });
    page.shapes.push(Shape {
        frame: Rect { x: 0.0, y: 0.0, w: m.accent_stripe_width, h: m.header_height },
        fill: p.accent,
    });

    let title = if slide.title.trim().is_empty() {
        format!("Slide {}", index + 1)
    } else {
        slide.title.clone()
    };
    page.texts.push(TextFrame {
        frame: Rect {
            x: m.header_title_x,
            y: m.header_title_top,
            w: m.header_title_width,
            h: m.header_title_height,
        },
        align: Align::Left,
        anchor: Anchor::Middle,
        runs: vec![TextRun {
            text: title,
            size: style.sizes.slide_title,
            bold: true,
            color: p.accent,
        }],
    });

    // Split layout only when the image reference actually resolves.
    let resolved = match slide.image_path.trim() {
        "" => None,
        path => images.resolve(path),
    };
    let (content_x, content_width, image_x) = match resolved {
        Some(_) => match slide.image_position {
            ImagePosition::Right => (m.content_x, m.split_content_width, m.image_right_x),
            ImagePosition::Left => (m.swapped_content_x, m.split_content_width, m.image_left_x),
        },
        None => (m.content_x, m.full_content_width, 0.0),
    };

    match slide.content_type {
        ContentKind::Paragraph => {
            let mut y = m.content_top;
            for text in split_paragraphs(&slide.content) {
                page.texts.push(TextFrame {
                    frame: Rect { x: content_x, y, w: content_width, h: m.paragraph_height },
                    align: Align::Left,
                    anchor: Anchor::Top,
                    runs: vec![TextRun {
                        text,
                        size: style.sizes.body,
                        bold: false,
                        color: p.dark_text,
                    }],
                });
                y += m.paragraph_step;
                if y > m.overflow_limit {
                    break;
                }
            }
        }
        ContentKind::Bullet => {
            let mut y = m.content_top;
            for line in split_bullet_lines(&slide.content) {
                page.texts.push(TextFrame {
                    frame: Rect {
                        x: content_x + m.bullet_inset,
                        y,
                        w: content_width - 2.0 * m.bullet_inset,
                        h: m.bullet_height,
                    },
                    align: Align::Left,
                    anchor: Anchor::Top,
                    runs: vec![
                        TextRun {
                            text: "\u{2022} ".to_string(),
                            size: style.sizes.bullet_glyph,
                            bold: true,
                            color: p.accent,
                        },
                        TextRun {
                            text: line,
                            size: style.sizes.body,
                            bold: false,
                            color: p.dark_text,
                        },
                    ],
                });
                y += m.bullet_step;
                if y > m.overflow_limit {
                    break;
                }
            }
        }
    }

    if let Some(path) = resolved {
        page.image = Some(ImageFrame {
            frame: Rect { x: image_x, y: m.image_top, w: m.image_width, h: m.image_height },
            path,
        });
    }

    // Page counter covers content slides only; the title page is not counted.
    page.texts.push(TextFrame {
        frame: Rect {
            x: m.footer_x,
            y: m.footer_top,
            w: m.footer_width,
            h: m.footer_height,
        },
        align: Align::Right,
        anchor: Anchor::Top,
        runs: vec![TextRun {
            text: format!("{} / {}", index + 1, total),
            size: style.sizes.footer,
            bold: false,
            color: p.muted,
        }],
    });

    page
}

/// Split paragraph content on blank-line boundaries, dropping whitespace-only
/// paragraphs and collapsing inner newlines to spaces.
pub fn split_paragraphs(content: &str) -> Vec<String> {
    content
        .split("\n\n")
        .filter(|p| !p.trim().is_empty())
        .map(|p| p.replace('\n', " ").trim().to_string())
        .collect()
}

/// Split bullet content on single newlines, trimming and dropping empties.
pub fn split_bullet_lines(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect()
}
