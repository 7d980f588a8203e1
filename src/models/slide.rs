use rusqlite::{Connection, params};
use serde::Deserialize;

/// How a slide's content field is interpreted by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentKind {
    #[default]
    Paragraph,
    Bullet,
}

impl ContentKind {
    /// Lenient parse of the stored string; anything unrecognized falls back
    /// to paragraph, matching how blank rows are treated.
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "bullet" => ContentKind::Bullet,
            _ => ContentKind::Paragraph,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Paragraph => "paragraph",
            ContentKind::Bullet => "bullet",
        }
    }
}

/// Which side of a content slide the image occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImagePosition {
    Left,
    #[default]
    Right,
}

impl ImagePosition {
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "left" => ImagePosition::Left,
            _ => ImagePosition::Right,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ImagePosition::Left => "left",
            ImagePosition::Right => "right",
        }
    }
}

/// A stored slide row. `slide_number` is the 1-based ordinal and the sole
/// render sort key.
#[derive(Debug, Clone)]
pub struct Slide {
    pub id: i64,
    pub presentation_id: i64,
    pub slide_number: i64,
    pub title: String,
    pub content: String,
    pub content_type: ContentKind,
    pub image_path: String,
    pub image_position: ImagePosition,
}

/// Incoming slide payload from the editor; every field is optional in the
/// JSON and defaults to the empty string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SlideForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, rename = "contentType")]
    pub content_type: String,
    #[serde(default, rename = "imagePath")]
    pub image_path: String,
    #[serde(default, rename = "imagePosition")]
    pub image_position: String,
}

fn row_to_slide(row: &rusqlite::Row) -> rusqlite::Result<Slide> {
    let content_type: String = row.get("content_type")?;
    let image_position: String = row.get("image_position")?;
    Ok(Slide {
        id: row.get("id")?,
        presentation_id: row.get("presentation_id")?,
        slide_number: row.get("slide_number")?,
        title: row.get("title")?,
        content: row.get("content")?,
        content_type: ContentKind::parse(&content_type),
        image_path: row.get("image_path")?,
        image_position: ImagePosition::parse(&image_position),
    })
}

/// Find all slides of a presentation, ordered by slide_number.
pub fn find_for_presentation(
    conn: &Connection,
    presentation_id: i64,
) -> rusqlite::Result<Vec<Slide>> {
    let mut stmt = conn.prepare(
        "SELECT id, presentation_id, slide_number, title, content, \
                content_type, image_path, image_position \
         FROM slides \
         WHERE presentation_id = ?1 \
         ORDER BY slide_number",
    )?;
    let slides = stmt
        .query_map(params![presentation_id], row_to_slide)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(slides)
}
