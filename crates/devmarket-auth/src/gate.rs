//! The access-gate policy table.

use crate::role::Role;
use crate::route::RouteClass;

/// Redirect target for requests that should land on the home page.
pub const HOME: &str = "/";
/// Redirect target for unauthenticated page requests.
pub const SIGN_IN: &str = "/auth/signin";

/// Why an API request was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// No credential present (401).
    Unauthorized,
    /// Credential present, role insufficient (403).
    Forbidden,
}

/// Outcome of gating a single request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// Forward the request unchanged.
    Allow,
    /// Page request lacking authorization: 302 to the target.
    Redirect(&'static str),
    /// API request lacking authorization.
    Deny(DenyReason),
}

/// Decide whether a request may proceed.
///
/// Policy, first match wins:
/// 1. auth page + valid token → redirect home (no re-authentication)
/// 2. admin surface, no token → sign-in redirect (page) or 401 (API)
/// 3. admin surface, non-privileged role → home redirect (page) or 403 (API)
/// 4. everything else → allow
///
/// Takes only the already-decoded role; performs no I/O.
pub fn decide(class: RouteClass, role: Option<Role>) -> GateDecision {
    match class {
        RouteClass::AuthPage => match role {
            Some(_) => GateDecision::Redirect(HOME),
            None => GateDecision::Allow,
        },
        RouteClass::AdminPage => match role {
            None => GateDecision::Redirect(SIGN_IN),
            Some(r) if r.is_privileged() => GateDecision::Allow,
            Some(_) => GateDecision::Redirect(HOME),
        },
        RouteClass::AdminApi => match role {
            None => GateDecision::Deny(DenyReason::Unauthorized),
            Some(r) if r.is_privileged() => GateDecision::Allow,
            Some(_) => GateDecision::Deny(DenyReason::Forbidden),
        },
        RouteClass::Public => GateDecision::Allow,
    }
}
