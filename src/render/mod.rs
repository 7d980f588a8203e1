//! Deck renderer: turns a presentation record and its ordered slides into a
//! `.pptx` file on disk. The renderer is a pure transformation over plain
//! data — it knows nothing of HTTP, sessions, or SQL. Callers hand it the
//! records, an image-resolution capability, and an output root; it returns
//! the relative path of the written file.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::models::presentation::Presentation;
use crate::models::slide::Slide;

pub mod layout;
pub mod pptx;
pub mod style;

pub use style::StyleSheet;

#[derive(Debug)]
pub enum RenderError {
    Io(std::io::Error),
    Zip(zip::result::ZipError),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::Io(e) => write!(f, "IO error: {e}"),
            RenderError::Zip(e) => write!(f, "Package write error: {e}"),
        }
    }
}

impl std::error::Error for RenderError {}

impl From<std::io::Error> for RenderError {
    fn from(e: std::io::Error) -> Self {
        RenderError::Io(e)
    }
}

impl From<zip::result::ZipError> for RenderError {
    fn from(e: zip::result::ZipError) -> Self {
        RenderError::Zip(e)
    }
}

/// Capability to turn a slide's relative image reference into a readable
/// absolute path. Lets the renderer check image availability without
/// embedding filesystem knowledge of the surrounding app.
pub trait ImageResolver {
    fn resolve(&self, relative: &str) -> Option<PathBuf>;
}

/// Production resolver: roots relative references at the application root
/// (where `uploads/images/` lives) and answers only for existing files.
pub struct UploadImageResolver {
    root: PathBuf,
}

impl UploadImageResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        UploadImageResolver { root: root.into() }
    }
}

impl ImageResolver for UploadImageResolver {
    fn resolve(&self, relative: &str) -> Option<PathBuf> {
        let path = self.root.join(relative);
        path.is_file().then_some(path)
    }
}

/// Reduce a title to a filesystem-safe token: alphanumerics, `_` and `-`
/// survive, everything else becomes `_`.
pub fn sanitize_title(title: &str) -> String {
    title
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Render the deck and write it under `{output_root}/uploads/pptx/`.
/// Returns the path relative to the output root.
pub fn render_deck(
    presentation: &Presentation,
    slides: &[Slide],
    images: &dyn ImageResolver,
    style: &StyleSheet,
    output_root: &Path,
) -> Result<String, RenderError> {
    let out_dir = output_root.join("uploads").join("pptx");
    fs::create_dir_all(&out_dir)?;

    let file_name = format!(
        "{}_{}.pptx",
        chrono::Utc::now().timestamp_millis(),
        sanitize_title(&presentation.title)
    );

    let deck = layout::build_deck(presentation, slides, images, style);
    let bytes = pptx::deck_to_bytes(&deck, style)?;
    fs::write(out_dir.join(&file_name), bytes)?;

    log::info!(
        "Rendered deck for presentation {} ({} pages) to uploads/pptx/{}",
        presentation.id,
        deck.pages.len(),
        file_name
    );
    Ok(format!("uploads/pptx/{file_name}"))
}
