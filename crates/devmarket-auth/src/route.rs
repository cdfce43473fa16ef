//! Request path classification.

/// Category of an incoming request path.
///
/// Derived, never stored — recomputed on every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    /// No authorization required.
    Public,
    /// Sign-in and related pages.
    AuthPage,
    /// Admin back-office pages.
    AdminPage,
    /// Admin JSON API.
    AdminApi,
}

/// Prefix match on a path segment boundary: `/admin` and `/admin/x`
/// match, `/administrivia` does not.
fn matches_prefix(path: &str, prefix: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

impl RouteClass {
    /// Classify a request path.
    ///
    /// `/api/admin` is checked before `/admin` so the API prefix is not
    /// misread as a page.
    pub fn classify(path: &str) -> Self {
        if matches_prefix(path, "/api/admin") {
            RouteClass::AdminApi
        } else if matches_prefix(path, "/admin") {
            RouteClass::AdminPage
        } else if matches_prefix(path, "/auth") {
            RouteClass::AuthPage
        } else {
            RouteClass::Public
        }
    }
}
