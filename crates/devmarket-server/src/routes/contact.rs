use actix_web::{web, HttpResponse};
use regex::Regex;
use std::sync::LazyLock;

use crate::error::ApiError;
use crate::metrics::CONTACTS_CREATED;
use crate::state::AppState;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

#[derive(Debug, serde::Deserialize)]
pub struct ContactRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub message: String,
}

impl ContactRequest {
    fn validate(&self) -> Result<(), ApiError> {
        let fields = [
            ("name", &self.name),
            ("email", &self.email),
            ("subject", &self.subject),
            ("category", &self.category),
            ("message", &self.message),
        ];
        for (field, value) in fields {
            if value.trim().is_empty() {
                return Err(ApiError::Validation(format!("{} is required", field)));
            }
        }

        if !EMAIL_RE.is_match(self.email.trim()) {
            return Err(ApiError::Validation("invalid email address".to_string()));
        }

        Ok(())
    }
}

/// POST /api/contact - Persist a contact form submission
///
/// All fields required; nothing is persisted when validation fails.
pub async fn submit(
    body: web::Json<ContactRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    body.validate()?;

    let contact = state.db.create_contact(
        body.name.trim(),
        body.email.trim(),
        body.subject.trim(),
        body.category.trim(),
        body.message.trim(),
    )?;

    CONTACTS_CREATED.inc();

    Ok(HttpResponse::Created().json(serde_json::json!({
        "success": true,
        "message": "Message sent successfully",
        "id": contact.id,
    })))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/api/contact").route(web::post().to(submit)));
}
