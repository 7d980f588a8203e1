use rusqlite::{Connection, OptionalExtension, params};
use serde::Deserialize;

use super::slide::SlideForm;

#[derive(Debug, Clone)]
pub struct Presentation {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub status: String,
    pub file_path: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Incoming save payload: the whole presentation plus its slides, replacing
/// whatever was stored before.
#[derive(Debug, Deserialize)]
pub struct PresentationForm {
    #[serde(default)]
    pub id: Option<i64>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub slides: Vec<SlideForm>,
}

fn row_to_presentation(row: &rusqlite::Row) -> rusqlite::Result<Presentation> {
    Ok(Presentation {
        id: row.get("id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        status: row.get("status")?,
        file_path: row.get("file_path")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

const SELECT_PRESENTATION: &str = "\
    SELECT id, title, description, status, file_path, created_at, updated_at \
    FROM presentations";

/// Find all presentations, most recently updated first.
pub fn list_all(conn: &Connection) -> rusqlite::Result<Vec<Presentation>> {
    let mut stmt = conn.prepare(&format!("{SELECT_PRESENTATION} ORDER BY updated_at DESC"))?;
    let rows = stmt
        .query_map([], row_to_presentation)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn find_by_id(conn: &Connection, id: i64) -> rusqlite::Result<Option<Presentation>> {
    conn.query_row(
        &format!("{SELECT_PRESENTATION} WHERE id = ?1"),
        params![id],
        row_to_presentation,
    )
    .optional()
}

/// Save a presentation and its slides in one transaction: insert or update
/// the presentation row, then replace all slides with ordinals 1..n taken
/// from the form order.
pub fn save(conn: &mut Connection, form: &PresentationForm) -> rusqlite::Result<i64> {
    let tx = conn.transaction()?;

    let presentation_id = match form.id {
        Some(id) => {
            tx.execute(
                "UPDATE presentations \
                 SET title = ?1, description = ?2, updated_at = datetime('now') \
                 WHERE id = ?3",
                params![form.title, form.description, id],
            )?;
            id
        }
        None => {
            tx.execute(
                "INSERT INTO presentations (title, description) VALUES (?1, ?2)",
                params![form.title, form.description],
            )?;
            tx.last_insert_rowid()
        }
    };

    tx.execute(
        "DELETE FROM slides WHERE presentation_id = ?1",
        params![presentation_id],
    )?;

    for (i, slide) in form.slides.iter().enumerate() {
        tx.execute(
            "INSERT INTO slides \
             (presentation_id, slide_number, title, content, content_type, image_path, image_position) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                presentation_id,
                (i + 1) as i64,
                slide.title,
                slide.content,
                if slide.content_type.trim().is_empty() { "paragraph" } else { slide.content_type.trim() },
                slide.image_path,
                if slide.image_position.trim().is_empty() { "right" } else { slide.image_position.trim() },
            ],
        )?;
    }

    tx.commit()?;
    Ok(presentation_id)
}

/// Delete a presentation (slides cascade). Returns the image paths its
/// slides referenced so the caller can unlink the files.
pub fn delete(conn: &Connection, id: i64) -> rusqlite::Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT image_path FROM slides \
         WHERE presentation_id = ?1 AND image_path <> ''",
    )?;
    let image_paths = stmt
        .query_map(params![id], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;

    conn.execute("DELETE FROM presentations WHERE id = ?1", params![id])?;
    Ok(image_paths)
}

/// Record a successful deck generation: status flips to completed and the
/// relative output path is stored.
pub fn mark_generated(conn: &Connection, id: i64, file_path: &str) -> rusqlite::Result<()> {
    conn.execute(
        "UPDATE presentations \
         SET status = 'completed', file_path = ?1, updated_at = datetime('now') \
         WHERE id = ?2",
        params![file_path, id],
    )?;
    Ok(())
}
