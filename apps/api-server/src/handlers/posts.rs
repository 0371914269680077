//! Post handlers. Visibility and ownership are decided by the access policy
//! and the post service; these functions translate HTTP to and from them.

use actix_web::{HttpRequest, HttpResponse, web};
use uuid::Uuid;

use scribe_core::domain::{AuthoredPost, PostChanges};
use scribe_core::policy;
use scribe_shared::dto::{PostRequest, PostResponse};

use super::pagination::{PageQuery, link, paginate};
use super::{POST_DETAIL, POST_LIST};
use crate::middleware::auth::OptionalIdentity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn present(req: &HttpRequest, authored: AuthoredPost) -> AppResult<PostResponse> {
    let AuthoredPost { post, author } = authored;

    Ok(PostResponse {
        url: link(req, POST_DETAIL, &[post.id.to_string().as_str()])?,
        id: post.id,
        title: post.title,
        slug: post.slug,
        content: post.content,
        author,
        is_published: post.is_published,
        created_at: post.created_at,
    })
}

fn changes(body: PostRequest) -> PostChanges {
    PostChanges {
        title: body.title,
        content: body.content,
        is_published: body.is_published,
    }
}

/// GET /api/posts/
pub async fn list_posts(
    req: HttpRequest,
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let page_request = query.page_request(state.page_size)?;
    let page = state.posts.list(&identity.requester(), page_request).await?;

    let body = paginate(&req, POST_LIST, page_request, page, |p| present(&req, p))?;
    Ok(HttpResponse::Ok().json(body))
}

/// POST /api/posts/
///
/// The requester is checked before the body, so anonymous callers get 403
/// whatever they send.
pub async fn create_post(
    req: HttpRequest,
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    body: Result<web::Json<PostRequest>, actix_web::Error>,
) -> actix_web::Result<HttpResponse> {
    let requester = identity.requester();
    if !policy::can_create(&requester) {
        return Err(AppError::Forbidden.into());
    }

    let created = state
        .posts
        .create(&requester, changes(body?.into_inner()))
        .await
        .map_err(AppError::from)?;

    Ok(HttpResponse::Created().json(present(&req, created)?))
}

/// GET /api/posts/{id}/
pub async fn get_post(
    req: HttpRequest,
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post = state.posts.get(&identity.requester(), path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(present(&req, post)?))
}

/// PATCH /api/posts/{id}/
pub async fn update_post(
    req: HttpRequest,
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<Uuid>,
    body: Result<web::Json<PostRequest>, actix_web::Error>,
) -> actix_web::Result<HttpResponse> {
    modify(req, state, identity, path.into_inner(), body, true).await
}

/// PUT /api/posts/{id}/
pub async fn replace_post(
    req: HttpRequest,
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<Uuid>,
    body: Result<web::Json<PostRequest>, actix_web::Error>,
) -> actix_web::Result<HttpResponse> {
    modify(req, state, identity, path.into_inner(), body, false).await
}

/// Authorize first, then parse the body: a refused write never reports
/// body errors.
async fn modify(
    req: HttpRequest,
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    id: Uuid,
    body: Result<web::Json<PostRequest>, actix_web::Error>,
    partial: bool,
) -> actix_web::Result<HttpResponse> {
    let post = state
        .posts
        .authorized_for_mutation(&identity.requester(), id)
        .await
        .map_err(AppError::from)?;

    let updated = state
        .posts
        .apply_changes(post, changes(body?.into_inner()), partial)
        .await
        .map_err(AppError::from)?;

    Ok(HttpResponse::Ok().json(present(&req, updated)?))
}

/// DELETE /api/posts/{id}/
pub async fn delete_post(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state
        .posts
        .delete(&identity.requester(), path.into_inner())
        .await?;

    Ok(HttpResponse::NoContent().finish())
}
