use actix_web::{web, HttpResponse};

use crate::db::DonationSettings;
use crate::error::ApiError;
use crate::state::AppState;

/// GET /api/donation-settings - Public donation settings
///
/// Falls back to hardcoded defaults when no settings row has been
/// persisted yet, so the donate page always renders.
pub async fn get_settings(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let settings = state
        .db
        .get_donation_settings()?
        .unwrap_or_else(DonationSettings::default);

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "settings": settings,
    })))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/api/donation-settings").route(web::get().to(get_settings)));
}
