use actix_web::{web, HttpResponse};

use crate::ads::resolve_tags;
use crate::error::ApiError;
use crate::state::AppState;

/// GET /api/admin/ads/verification-tags - Resolved vendor meta tags
///
/// Admin-only; the access gate rejects unprivileged callers before this
/// handler runs.
pub async fn verification_tags(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let vendors = state.db.list_active_vendors()?;
    let tags = resolve_tags(&vendors);

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "tags": tags,
    })))
}

/// GET /ads.txt - Serve the ads.txt file verbatim
pub async fn ads_txt(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let body = match tokio::fs::read_to_string(&state.config.ads_txt_path).await {
        Ok(body) => body,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ApiError::NotFound("ads.txt".to_string()));
        }
        Err(e) => {
            return Err(ApiError::Internal(format!("failed to read ads.txt: {}", e)));
        }
    };

    Ok(HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .insert_header(("Cache-Control", "public, max-age=3600"))
        .body(body))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/admin/ads/verification-tags").route(web::get().to(verification_tags)),
    )
    .service(web::resource("/ads.txt").route(web::get().to(ads_txt)));
}
