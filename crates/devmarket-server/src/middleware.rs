//! Access-gate middleware.
//!
//! Adapts the pure policy in `devmarket_auth` onto actix: reads the
//! session token, classifies the path, and either forwards the request,
//! redirects the browser, or answers 401/403 JSON. Runs before every
//! handler and touches no store.

use std::future::{ready, Ready};

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    Error, HttpResponse,
};
use futures::future::LocalBoxFuture;

use devmarket_auth::{decide, DenyReason, GateDecision, Role, RouteClass, SessionKeys};

use crate::metrics::GATE_DECISIONS;

/// Name of the session cookie set by the auth collaborator.
pub const SESSION_COOKIE: &str = "session";

/// Read the session role from a request, if a valid token is attached.
///
/// Checks `Authorization: Bearer` first, then the session cookie.
/// Expired or malformed tokens count as absent.
pub fn extract_role(req: &ServiceRequest, keys: &SessionKeys) -> Option<Role> {
    let bearer = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(String::from);

    let token = bearer.or_else(|| req.cookie(SESSION_COOKIE).map(|c| c.value().to_string()))?;

    keys.decode(&token).ok().map(|claims| claims.role)
}

#[derive(Clone)]
pub struct AccessGate {
    keys: SessionKeys,
}

impl AccessGate {
    pub fn new(keys: SessionKeys) -> Self {
        Self { keys }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AccessGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AccessGateMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AccessGateMiddleware {
            service,
            keys: self.keys.clone(),
        }))
    }
}

pub struct AccessGateMiddleware<S> {
    service: S,
    keys: SessionKeys,
}

impl<S, B> Service<ServiceRequest> for AccessGateMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let class = RouteClass::classify(req.path());
        let role = extract_role(&req, &self.keys);

        match decide(class, role) {
            GateDecision::Allow => {
                GATE_DECISIONS.with_label_values(&["allow"]).inc();
                let fut = self.service.call(req);
                Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
            }
            GateDecision::Redirect(target) => {
                GATE_DECISIONS.with_label_values(&["redirect"]).inc();
                let (request, _) = req.into_parts();
                let response = HttpResponse::Found()
                    .insert_header((header::LOCATION, target))
                    .finish()
                    .map_into_right_body();
                Box::pin(async move { Ok(ServiceResponse::new(request, response)) })
            }
            GateDecision::Deny(reason) => {
                GATE_DECISIONS.with_label_values(&["deny"]).inc();
                let (request, _) = req.into_parts();
                let response = match reason {
                    DenyReason::Unauthorized => {
                        HttpResponse::Unauthorized().json(serde_json::json!({
                            "error": "unauthorized",
                            "message": "Authentication required"
                        }))
                    }
                    DenyReason::Forbidden => HttpResponse::Forbidden().json(serde_json::json!({
                        "error": "forbidden",
                        "message": "Insufficient privileges"
                    })),
                }
                .map_into_right_body();
                Box::pin(async move { Ok(ServiceResponse::new(request, response)) })
            }
        }
    }
}
