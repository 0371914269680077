//! Read-only user handlers.

use actix_web::{HttpRequest, HttpResponse, web};
use uuid::Uuid;

use scribe_core::domain::UserProfile;
use scribe_shared::dto::UserResponse;

use super::pagination::{PageQuery, link, paginate};
use super::{POST_DETAIL, USER_DETAIL, USER_LIST};
use crate::middleware::auth::OptionalIdentity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

fn present(req: &HttpRequest, profile: UserProfile) -> AppResult<UserResponse> {
    let posts = profile
        .post_ids
        .iter()
        .map(|id| link(req, POST_DETAIL, &[id.to_string().as_str()]))
        .collect::<AppResult<Vec<_>>>()?;

    Ok(UserResponse {
        url: link(req, USER_DETAIL, &[profile.user.id.to_string().as_str()])?,
        id: profile.user.id,
        username: profile.user.username,
        posts,
    })
}

/// GET /api/users/
pub async fn list_users(
    req: HttpRequest,
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let page_request = query.page_request(state.page_size)?;
    let page = state.users.list(&identity.requester(), page_request).await?;

    let body = paginate(&req, USER_LIST, page_request, page, |u| present(&req, u))?;
    Ok(HttpResponse::Ok().json(body))
}

/// GET /api/users/{id}/
pub async fn get_user(
    req: HttpRequest,
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let profile = state.users.get(&identity.requester(), path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(present(&req, profile)?))
}
