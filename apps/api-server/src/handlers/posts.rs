//! Post handlers. Reads expand the author to `{id, name}`.

use actix_web::{HttpResponse, web};

use blog_core::domain::{NewPost, PostPatch};
use blog_core::validation::parse_id;
use blog_shared::MessageResponse;
use blog_shared::dto::{CreatePostRequest, UpdatePostRequest};

use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /posts
pub async fn list(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let posts = state.posts.get_all().await?;
    Ok(HttpResponse::Ok().json(posts))
}

/// POST /posts
pub async fn create(
    state: web::Data<AppState>,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let post = state
        .posts
        .create(NewPost {
            title: req.title,
            body: req.body,
            author: req.author,
            image: req.image,
        })
        .await?;
    Ok(HttpResponse::Created().json(post))
}

/// GET /posts/{id} - `null` when absent.
pub async fn get(state: web::Data<AppState>, path: web::Path<String>) -> AppResult<HttpResponse> {
    let id = parse_id("Post", &path)?;
    let post = state.posts.get_by_id(id).await?;
    Ok(HttpResponse::Ok().json(post))
}

/// PUT /posts/{id}
pub async fn update(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let id = parse_id("Post", &path)?;
    let req = body.into_inner();
    let post = state
        .posts
        .update(
            id,
            PostPatch {
                title: req.title,
                body: req.body,
                author: req.author,
                image: req.image,
            },
        )
        .await?;
    Ok(HttpResponse::Ok().json(post))
}

/// DELETE /posts/{id}
pub async fn delete(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = parse_id("Post", &path)?;
    state.posts.delete(id).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Post deleted")))
}
