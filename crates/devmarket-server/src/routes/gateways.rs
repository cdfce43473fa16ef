use actix_web::{web, HttpResponse};

use crate::error::ApiError;
use crate::state::AppState;

/// GET /api/payment-gateways - List enabled gateways, public projection
///
/// The rows come back as [`crate::db::GatewayInfo`], which carries no
/// secret-key field, so the secret is structurally absent here rather
/// than filtered out.
pub async fn list_gateways(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let gateways = state.db.list_enabled_gateways()?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "gateways": gateways,
    })))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/api/payment-gateways").route(web::get().to(list_gateways)));
}
