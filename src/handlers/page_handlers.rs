use actix_web::{HttpResponse, web};
use serde::Deserialize;

use crate::db::DbPool;
use crate::errors::{AppError, render};
use crate::models::{presentation, slide};
use crate::templates_structs::{EditorTemplate, IndexTemplate, ViewTemplate};

#[derive(Debug, Deserialize)]
pub struct IdQuery {
    pub id: Option<i64>,
}

/// GET / — list all presentations, most recently updated first.
pub async fn index(pool: web::Data<DbPool>) -> Result<HttpResponse, AppError> {
    let conn = pool.get()?;
    let presentations = presentation::list_all(&conn)?;
    render(IndexTemplate { presentations })
}

/// GET /editor — deck editor, blank or loaded from `?id=`.
pub async fn editor(
    pool: web::Data<DbPool>,
    query: web::Query<IdQuery>,
) -> Result<HttpResponse, AppError> {
    let conn = pool.get()?;

    let mut payload = serde_json::json!({
        "id": serde_json::Value::Null,
        "title": "",
        "description": "",
        "slides": [],
    });

    if let Some(id) = query.id {
        if let Some(pres) = presentation::find_by_id(&conn, id)? {
            let slides: Vec<serde_json::Value> = slide::find_for_presentation(&conn, id)?
                .iter()
                .map(|s| {
                    serde_json::json!({
                        "title": s.title,
                        "content": s.content,
                        "contentType": s.content_type.as_str(),
                        "imagePath": s.image_path,
                        "imagePosition": s.image_position.as_str(),
                    })
                })
                .collect();
            payload = serde_json::json!({
                "id": pres.id,
                "title": pres.title,
                "description": pres.description,
                "slides": slides,
            });
        }
    }

    // The editor always shows at least one slide card.
    if payload["slides"].as_array().is_none_or(|s| s.is_empty()) {
        payload["slides"] = serde_json::json!([{
            "title": "",
            "content": "",
            "contentType": "paragraph",
            "imagePath": "",
            "imagePosition": "right",
        }]);
    }

    render(EditorTemplate {
        payload: payload.to_string(),
    })
}

/// GET /view — read-only presentation view; redirects home when missing.
pub async fn view(
    pool: web::Data<DbPool>,
    query: web::Query<IdQuery>,
) -> Result<HttpResponse, AppError> {
    let Some(id) = query.id else {
        return Ok(see_other("/"));
    };

    let conn = pool.get()?;
    let Some(pres) = presentation::find_by_id(&conn, id)? else {
        return Ok(see_other("/"));
    };
    let slides = slide::find_for_presentation(&conn, id)?;

    render(ViewTemplate {
        presentation: pres,
        slides,
    })
}

fn see_other(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header(("Location", location))
        .finish()
}
