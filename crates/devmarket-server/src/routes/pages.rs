use actix_web::{web, HttpResponse};

use crate::error::ApiError;
use crate::metrics::{PAGE_VIEWS_TOTAL, PAGE_VIEW_FAILURES};
use crate::state::AppState;

#[derive(Debug, serde::Deserialize)]
pub struct PageListQuery {
    #[serde(rename = "includeInactive", default)]
    pub include_inactive: bool,
}

/// GET /api/payment-pages - Public payment page listing
///
/// Listing a page counts as a view: every page in the result gets its
/// view counter bumped by one, each as an independent update. A failed
/// increment is logged and skipped so the listing itself never fails on
/// analytics. The serialized `viewCount` is the pre-increment value.
pub async fn list_pages(
    query: web::Query<PageListQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let pages = state.db.list_pages(query.include_inactive)?;

    for page in &pages {
        match state.db.increment_view_count(page.id) {
            Ok(()) => PAGE_VIEWS_TOTAL.inc(),
            Err(e) => {
                PAGE_VIEW_FAILURES.inc();
                tracing::warn!("Failed to count view for page '{}': {}", page.slug, e);
            }
        }
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "pages": pages,
    })))
}

/// GET /api/payment-page/{slug} - Single page by slug
///
/// Only active, public pages resolve; counts one view on success.
pub async fn get_page(
    path: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let slug = path.into_inner();

    let page = state
        .db
        .get_page(&slug)?
        .ok_or_else(|| ApiError::NotFound(format!("payment page '{}'", slug)))?;

    match state.db.increment_view_count(page.id) {
        Ok(()) => PAGE_VIEWS_TOTAL.inc(),
        Err(e) => {
            PAGE_VIEW_FAILURES.inc();
            tracing::warn!("Failed to count view for page '{}': {}", page.slug, e);
        }
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "page": page,
    })))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/api/payment-pages").route(web::get().to(list_pages)))
        .service(web::resource("/api/payment-page/{slug}").route(web::get().to(get_page)));
}
