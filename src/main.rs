use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::{App, HttpServer, cookie::Key, middleware, web};

use deckbuilder::{db, handlers};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    // Ensure working directories exist before anything touches them
    std::fs::create_dir_all("data").expect("Failed to create data directory");
    std::fs::create_dir_all("uploads/images").expect("Failed to create uploads/images directory");
    std::fs::create_dir_all("uploads/pptx").expect("Failed to create uploads/pptx directory");

    // Initialize database
    let pool = db::init_pool("data/app.db");
    db::run_migrations(&pool);

    // Session encryption key — load from SESSION_KEY env var for persistent sessions across restarts
    let secret_key = match std::env::var("SESSION_KEY") {
        Ok(val) if val.len() >= 64 => {
            log::info!("Using SESSION_KEY from environment");
            Key::from(val.as_bytes())
        }
        Ok(val) => {
            log::warn!(
                "SESSION_KEY too short ({} bytes, need 64+) — generating random key",
                val.len()
            );
            Key::generate()
        }
        Err(_) => {
            log::warn!("No SESSION_KEY set — generating random key (sessions lost on restart)");
            Key::generate()
        }
    };

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    log::info!("Deck Builder running at http://127.0.0.1:{port}");

    HttpServer::new(move || {
        let session_mw =
            SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                .cookie_secure(false)
                .cookie_http_only(true)
                .build();

        App::new()
            .wrap(session_mw)
            .wrap(middleware::Logger::default())
            .app_data(web::Data::new(pool.clone()))
            // Static files and generated artifacts
            .service(actix_files::Files::new("/static", "./static"))
            .service(actix_files::Files::new("/uploads", "./uploads"))
            // Pages
            .route("/", web::get().to(handlers::page_handlers::index))
            .route("/editor", web::get().to(handlers::page_handlers::editor))
            .route("/view", web::get().to(handlers::page_handlers::view))
            // JSON API
            .route("/api/upload_image", web::post().to(handlers::api_handlers::upload_image))
            .route("/api/save_presentation", web::post().to(handlers::api_handlers::save_presentation))
            .route("/api/get_presentation", web::get().to(handlers::api_handlers::get_presentation))
            .route("/api/get_presentations", web::get().to(handlers::api_handlers::get_presentations))
            .route("/api/delete_presentation", web::post().to(handlers::api_handlers::delete_presentation))
            .route("/api/generate_pptx", web::post().to(handlers::api_handlers::generate_pptx))
            // Default 404 handler (must be registered last)
            .default_service(web::to(|| async {
                let html = include_str!("../templates/errors/404.html");
                actix_web::HttpResponse::NotFound()
                    .content_type("text/html; charset=utf-8")
                    .body(html)
            }))
    })
    .bind(("127.0.0.1", port))?
    .run()
    .await
}
