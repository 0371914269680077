//! API root - links to the top-level collections.

use actix_web::{HttpRequest, HttpResponse};
use scribe_shared::dto::ApiRootResponse;

use super::{POST_LIST, USER_LIST, pagination::link};
use crate::middleware::error::AppResult;

/// GET /api/
pub async fn api_root(req: HttpRequest) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(ApiRootResponse {
        users: link(&req, USER_LIST, &[])?,
        posts: link(&req, POST_LIST, &[])?,
    }))
}
