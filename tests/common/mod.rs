//! Shared test infrastructure: temporary SQLite databases and deck fixtures.

use std::path::PathBuf;

use rusqlite::Connection;
use tempfile::TempDir;

use deckbuilder::db::MIGRATIONS;
use deckbuilder::models::presentation::Presentation;
use deckbuilder::models::slide::{ContentKind, ImagePosition, Slide};
use deckbuilder::render::ImageResolver;

/// Setup a test database with the schema applied.
///
/// Returns a tuple of (TempDir, Connection) where TempDir must be kept
/// alive for the Connection to remain valid.
pub fn setup_test_db() -> (TempDir, Connection) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = dir.path().join("test.db");
    let conn = Connection::open(&db_path).expect("Failed to open test DB");

    conn.execute_batch("PRAGMA foreign_keys=ON; PRAGMA journal_mode=WAL;")
        .expect("Failed to set pragmas");
    conn.execute_batch(MIGRATIONS)
        .expect("Failed to run migrations");

    (dir, conn)
}

/// In-memory presentation record for renderer tests (no DB involved).
pub fn presentation_fixture(title: &str, description: &str) -> Presentation {
    Presentation {
        id: 1,
        title: title.to_string(),
        description: description.to_string(),
        status: "draft".to_string(),
        file_path: String::new(),
        created_at: String::new(),
        updated_at: String::new(),
    }
}

pub fn slide_fixture(slide_number: i64, title: &str, content: &str, kind: ContentKind) -> Slide {
    Slide {
        id: slide_number,
        presentation_id: 1,
        slide_number,
        title: title.to_string(),
        content: content.to_string(),
        content_type: kind,
        image_path: String::new(),
        image_position: ImagePosition::Right,
    }
}

/// Resolver stub that answers every lookup with the same path (or nothing).
pub struct StubResolver(pub Option<PathBuf>);

impl ImageResolver for StubResolver {
    fn resolve(&self, _relative: &str) -> Option<PathBuf> {
        self.0.clone()
    }
}
