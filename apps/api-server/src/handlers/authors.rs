//! Author handlers.

use actix_web::{HttpResponse, web};

use blog_core::domain::{AuthorPatch, NewAuthor};
use blog_core::validation::parse_id;
use blog_shared::MessageResponse;
use blog_shared::dto::{CreateAuthorRequest, UpdateAuthorRequest};

use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /authors - every author with posts expanded.
pub async fn list(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let authors = state.authors.get_all().await?;
    Ok(HttpResponse::Ok().json(authors))
}

/// POST /authors
pub async fn create(
    state: web::Data<AppState>,
    body: web::Json<CreateAuthorRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let author = state.authors.create(NewAuthor { name: req.name }).await?;
    Ok(HttpResponse::Created().json(author))
}

/// GET /authors/{id} - posts expanded, `null` when absent.
pub async fn get(state: web::Data<AppState>, path: web::Path<String>) -> AppResult<HttpResponse> {
    let id = parse_id("Author", &path)?;
    let author = state.authors.get_by_id(id).await?;
    Ok(HttpResponse::Ok().json(author))
}

/// PUT /authors/{id}
pub async fn update(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<UpdateAuthorRequest>,
) -> AppResult<HttpResponse> {
    let id = parse_id("Author", &path)?;
    let req = body.into_inner();
    let author = state
        .authors
        .update(id, AuthorPatch { name: req.name })
        .await?;
    Ok(HttpResponse::Ok().json(author))
}

/// DELETE /authors/{id}
pub async fn delete(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = parse_id("Author", &path)?;
    state.authors.delete(id).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Author deleted")))
}
