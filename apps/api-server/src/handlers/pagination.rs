//! Page-number pagination and link building.

use actix_web::HttpRequest;
use serde::Deserialize;

use scribe_core::ports::{Page, PageRequest};
use scribe_shared::Paginated;

use crate::middleware::error::{AppError, AppResult};

const INVALID_PAGE: &str = "Invalid page.";

/// `?page=N` query string. Kept as text so that junk values become 404s
/// instead of extractor errors.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

impl PageQuery {
    pub fn page_request(&self, page_size: u64) -> AppResult<PageRequest> {
        let number = match self.page.as_deref() {
            None => 1,
            Some(raw) => raw
                .parse::<u64>()
                .ok()
                .filter(|n| *n >= 1)
                .ok_or_else(|| AppError::NotFound(INVALID_PAGE.to_string()))?,
        };

        Ok(PageRequest::new(number, page_size))
    }
}

/// Absolute URL of a named route.
pub fn link(req: &HttpRequest, name: &str, elements: &[&str]) -> AppResult<String> {
    req.url_for(name, elements)
        .map(|url| url.to_string())
        .map_err(|e| AppError::Internal(format!("url generation for {}: {}", name, e)))
}

fn page_link(req: &HttpRequest, name: &str, number: u64) -> AppResult<String> {
    let mut url = req
        .url_for_static(name)
        .map_err(|e| AppError::Internal(format!("url generation for {}: {}", name, e)))?;

    // the first page is addressed without a page parameter
    if number > 1 {
        url.query_pairs_mut()
            .clear()
            .append_pair("page", &number.to_string());
    }

    Ok(url.to_string())
}

/// Wrap a page of results in the pagination envelope for route `name`.
///
/// A page past the last one is rejected; page 1 is always valid.
pub fn paginate<T, U>(
    req: &HttpRequest,
    name: &str,
    request: PageRequest,
    page: Page<T>,
    mut present: impl FnMut(T) -> AppResult<U>,
) -> AppResult<Paginated<U>> {
    let last = page.total.div_ceil(request.size).max(1);
    if request.number > last {
        return Err(AppError::NotFound(INVALID_PAGE.to_string()));
    }

    let next = if request.number < last {
        Some(page_link(req, name, request.number + 1)?)
    } else {
        None
    };
    let previous = if request.number > 1 {
        Some(page_link(req, name, request.number - 1)?)
    } else {
        None
    };

    let results = page
        .items
        .into_iter()
        .map(&mut present)
        .collect::<AppResult<Vec<U>>>()?;

    Ok(Paginated {
        count: page.total,
        next,
        previous,
        results,
    })
}
