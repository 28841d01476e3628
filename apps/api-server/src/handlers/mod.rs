//! HTTP handlers and route configuration.

mod authors;
mod health;
mod posts;
mod tags;


use actix_web::web;

use crate::middleware::error::AppError;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .route("/health", web::get().to(health::health_check))
    .service(
        web::scope("/authors")
            .route("", web::get().to(authors::list))
            .route("", web::post().to(authors::create))
            .route("/{id}", web::get().to(authors::get))
            .route("/{id}", web::put().to(authors::update))
            .route("/{id}", web::delete().to(authors::delete)),
    )
    .service(
        web::scope("/posts")
            .route("", web::get().to(posts::list))
            .route("", web::post().to(posts::create))
            .route("/{id}", web::get().to(posts::get))
            .route("/{id}", web::put().to(posts::update))
            .route("/{id}", web::delete().to(posts::delete)),
    )
    .service(
        web::scope("/tags")
            .route("", web::get().to(tags::list))
            .route("", web::post().to(tags::create))
            .route("/{id}", web::get().to(tags::get))
            .route("/{id}", web::delete().to(tags::delete))
            .route("/{tag_id}/posts/{post_id}", web::post().to(tags::link_post))
            .route("/{tag_id}/posts/{post_id}", web::delete().to(tags::unlink_post)),
    );
}
