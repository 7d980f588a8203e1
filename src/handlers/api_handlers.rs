use std::path::Path;

use actix_web::{HttpResponse, web};
use base64::Engine;
use serde::Deserialize;

use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::{presentation, slide};
use crate::render::{self, StyleSheet, UploadImageResolver};

/// Every API endpoint answers with this envelope: `success` plus either the
/// payload or a human-readable `message`.
fn fail(message: impl Into<String>) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "success": false,
        "message": message.into(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct UploadImageRequest {
    pub file_name: String,
    /// Base64 image bytes, with or without a `data:...;base64,` prefix.
    pub data: String,
}

/// POST /api/upload_image — store an image under uploads/images/ and return
/// its relative path for slide records to reference.
pub async fn upload_image(body: web::Json<UploadImageRequest>) -> Result<HttpResponse, AppError> {
    let encoded = body
        .data
        .split_once(";base64,")
        .map(|(_, rest)| rest)
        .unwrap_or(&body.data);

    let bytes = match base64::engine::general_purpose::STANDARD.decode(encoded.trim()) {
        Ok(bytes) if !bytes.is_empty() => bytes,
        _ => return Ok(fail("No image provided")),
    };

    let safe_name: String = body
        .file_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let safe_name = if safe_name.is_empty() {
        "image".to_string()
    } else {
        safe_name
    };

    let file_name = format!("{}-{}", chrono::Utc::now().timestamp_millis(), safe_name);
    std::fs::create_dir_all("uploads/images")?;
    std::fs::write(Path::new("uploads/images").join(&file_name), bytes)?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "file_path": format!("uploads/images/{file_name}"),
        "file_name": file_name,
    })))
}

/// POST /api/save_presentation — upsert the presentation and replace its
/// slides in one transaction.
pub async fn save_presentation(
    pool: web::Data<DbPool>,
    body: web::Json<presentation::PresentationForm>,
) -> Result<HttpResponse, AppError> {
    if body.title.trim().is_empty() {
        return Ok(fail("Title is required"));
    }

    let mut conn = pool.get()?;
    let presentation_id = presentation::save(&mut conn, &body)?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "presentation_id": presentation_id,
        "message": "Saved successfully",
    })))
}

#[derive(Debug, Deserialize)]
pub struct IdQuery {
    pub id: Option<i64>,
}

/// GET /api/get_presentation?id= — one presentation with its ordered slides.
pub async fn get_presentation(
    pool: web::Data<DbPool>,
    query: web::Query<IdQuery>,
) -> Result<HttpResponse, AppError> {
    let Some(id) = query.id else {
        return Ok(fail("Presentation ID is required"));
    };

    let conn = pool.get()?;
    let Some(pres) = presentation::find_by_id(&conn, id)? else {
        return Ok(fail("Not found"));
    };

    let slides: Vec<serde_json::Value> = slide::find_for_presentation(&conn, id)?
        .iter()
        .map(|s| {
            serde_json::json!({
                "id": s.id,
                "slide_number": s.slide_number,
                "title": s.title,
                "content": s.content,
                "content_type": s.content_type.as_str(),
                "image_path": s.image_path,
                "image_position": s.image_position.as_str(),
            })
        })
        .collect();

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "data": {
            "id": pres.id,
            "title": pres.title,
            "description": pres.description,
            "status": pres.status,
            "file_path": pres.file_path,
            "created_at": pres.created_at,
            "updated_at": pres.updated_at,
            "slides": slides,
        },
    })))
}

/// GET /api/get_presentations — all presentations, newest first.
pub async fn get_presentations(pool: web::Data<DbPool>) -> Result<HttpResponse, AppError> {
    let conn = pool.get()?;
    let data: Vec<serde_json::Value> = presentation::list_all(&conn)?
        .iter()
        .map(|p| {
            serde_json::json!({
                "id": p.id,
                "title": p.title,
                "description": p.description,
                "status": p.status,
                "created_at": p.created_at,
                "updated_at": p.updated_at,
            })
        })
        .collect();

    Ok(HttpResponse::Ok().json(serde_json::json!({ "success": true, "data": data })))
}

#[derive(Debug, Deserialize)]
pub struct DeleteRequest {
    pub id: i64,
}

/// POST /api/delete_presentation — remove the presentation, its slides, and
/// any uploaded images they referenced.
pub async fn delete_presentation(
    pool: web::Data<DbPool>,
    body: web::Json<DeleteRequest>,
) -> Result<HttpResponse, AppError> {
    let conn = pool.get()?;
    let image_paths = presentation::delete(&conn, body.id)?;

    for path in image_paths {
        if let Err(e) = std::fs::remove_file(&path) {
            log::warn!("Could not remove image {path}: {e}");
        }
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": "Deleted successfully",
    })))
}

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub presentation_id: Option<i64>,
}

/// POST /api/generate_pptx — render the deck to uploads/pptx/ and record the
/// generated file on the presentation row.
pub async fn generate_pptx(
    pool: web::Data<DbPool>,
    body: web::Json<GenerateRequest>,
) -> Result<HttpResponse, AppError> {
    let Some(id) = body.presentation_id else {
        return Ok(fail("Presentation ID is required"));
    };

    let conn = pool.get()?;
    let Some(pres) = presentation::find_by_id(&conn, id)? else {
        return Ok(fail("Presentation not found"));
    };
    let slides = slide::find_for_presentation(&conn, id)?;

    let resolver = UploadImageResolver::new(".");
    let style = StyleSheet::default();
    let file_path = render::render_deck(&pres, &slides, &resolver, &style, Path::new("."))?;

    presentation::mark_generated(&conn, id, &file_path)?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "file_path": file_path,
        "message": "PPTX generated successfully",
    })))
}
