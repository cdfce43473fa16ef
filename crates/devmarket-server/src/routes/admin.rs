//! Admin back-office JSON API.
//!
//! Role enforcement happens in the access-gate middleware; these
//! handlers assume a privileged caller.

use actix_web::{web, HttpResponse};

use crate::db::UpsertGateway;
use crate::error::ApiError;
use crate::state::AppState;

const SECRET_MASK: &str = "••••••••";

/// GET /api/admin/payment-gateways - All gateway rows, secrets masked
pub async fn list_gateways(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let gateways = state.db.list_gateways()?;

    let masked: Vec<serde_json::Value> = gateways
        .into_iter()
        .map(|g| {
            serde_json::json!({
                "gateway": g.gateway,
                "displayName": g.display_name,
                "description": g.description,
                "isEnabled": g.is_enabled,
                "displayOrder": g.display_order,
                "publicKey": g.public_key,
                "secretKey": g.secret_key.map(|_| SECRET_MASK),
                "supportedCurrencies": g.supported_currencies,
                "updatedAt": g.updated_at,
            })
        })
        .collect();

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "gateways": masked,
    })))
}

/// POST /api/admin/payment-gateways - Create or update a gateway config
pub async fn upsert_gateway(
    body: web::Json<UpsertGateway>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    if body.gateway.trim().is_empty() || body.display_name.trim().is_empty() {
        return Err(ApiError::Validation(
            "gateway and display name are required".to_string(),
        ));
    }

    state.db.upsert_gateway(&body)?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "gateway": body.gateway,
    })))
}

/// GET /api/admin/contacts - Contact form submissions, newest first
pub async fn list_contacts(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let contacts = state.db.list_contacts()?;
    let count = contacts.len();

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "contacts": contacts,
        "count": count,
    })))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/admin/payment-gateways")
            .route(web::get().to(list_gateways))
            .route(web::post().to(upsert_gateway)),
    )
    .service(web::resource("/api/admin/contacts").route(web::get().to(list_contacts)));
}
