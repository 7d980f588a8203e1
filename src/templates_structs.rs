use askama::Template;

use crate::models::presentation::Presentation;
use crate::models::slide::Slide;

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub presentations: Vec<Presentation>,
}

/// The editor page carries the presentation as a JSON payload consumed by
/// static/js/editor.js.
#[derive(Template)]
#[template(path = "editor.html")]
pub struct EditorTemplate {
    pub payload: String,
}

#[derive(Template)]
#[template(path = "view.html")]
pub struct ViewTemplate {
    pub presentation: Presentation,
    pub slides: Vec<Slide>,
}
