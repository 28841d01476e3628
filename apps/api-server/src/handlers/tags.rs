//! Tag handlers, including the tag/post link endpoints.

use actix_web::{HttpResponse, web};

use blog_core::domain::NewTag;
use blog_core::validation::parse_id;
use blog_shared::MessageResponse;
use blog_shared::dto::CreateTagRequest;

use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /tags
pub async fn list(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let tags = state.tags.get_all().await?;
    Ok(HttpResponse::Ok().json(tags))
}

/// POST /tags
pub async fn create(
    state: web::Data<AppState>,
    body: web::Json<CreateTagRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let tag = state.tags.create(NewTag { name: req.name }).await?;
    Ok(HttpResponse::Created().json(tag))
}

/// GET /tags/{id} - posts expanded, `null` when absent.
pub async fn get(state: web::Data<AppState>, path: web::Path<String>) -> AppResult<HttpResponse> {
    let id = parse_id("Tag", &path)?;
    let tag = state.tags.get_by_id(id).await?;
    Ok(HttpResponse::Ok().json(tag))
}

/// DELETE /tags/{id}
pub async fn delete(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = parse_id("Tag", &path)?;
    state.tags.delete(id).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Tag deleted")))
}

/// POST /tags/{tag_id}/posts/{post_id}
pub async fn link_post(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> AppResult<HttpResponse> {
    let (tag_id, post_id) = path.into_inner();
    let tag_id = parse_id("Tag", &tag_id)?;
    let post_id = parse_id("Post", &post_id)?;

    state.tags.add_tag_to_post(post_id, tag_id).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Tag added to post")))
}

/// DELETE /tags/{tag_id}/posts/{post_id}
pub async fn unlink_post(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> AppResult<HttpResponse> {
    let (tag_id, post_id) = path.into_inner();
    let tag_id = parse_id("Tag", &tag_id)?;
    let post_id = parse_id("Post", &post_id)?;

    state.tags.remove_tag_from_post(post_id, tag_id).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Tag removed from post")))
}
