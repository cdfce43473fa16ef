//! Ad-vendor verification tag resolution.
//!
//! Vendor configs are operator-maintained JSON bags; the verification
//! code has historically been stored under several key names. The alias
//! order here is load-bearing: `verificationCode` wins over
//! `verification_code`, which wins over `code`.

use crate::db::AdVendor;

/// Accepted config keys for the verification code, in priority order.
const CODE_ALIASES: [&str; 3] = ["verificationCode", "verification_code", "code"];

/// A resolved site-ownership meta tag.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct VerificationTag {
    /// Vendor display name.
    pub vendor: String,
    /// Canonical meta-tag name attribute.
    pub name: String,
    /// Meta-tag content attribute.
    pub content: String,
}

/// Map a vendor type to its canonical meta-tag name.
/// Unknown types fall back to a generic tag.
fn tag_name(vendor_type: &str) -> &'static str {
    match vendor_type {
        "GOOGLE_ADSENSE" => "google-site-verification",
        "MONETAGE" => "monetag",
        "MEDIANET" => "media.net-site-verification",
        "BUZZFEED_ADS" => "buzzfeed-verification",
        _ => "site-verification",
    }
}

/// Extract a vendor's verification code, if present.
///
/// First non-empty string under an accepted alias wins; anything else
/// (missing keys, non-string values, empty strings) resolves to None.
fn resolve_code(config: &serde_json::Value) -> Option<&str> {
    let obj = config.as_object()?;
    CODE_ALIASES
        .iter()
        .filter_map(|key| obj.get(*key))
        .filter_map(|v| v.as_str())
        .find(|s| !s.trim().is_empty())
}

/// Resolve meta tags for the given vendors.
/// Vendors without a resolvable code are dropped entirely.
pub fn resolve_tags(vendors: &[AdVendor]) -> Vec<VerificationTag> {
    vendors
        .iter()
        .filter_map(|v| {
            resolve_code(&v.config).map(|code| VerificationTag {
                vendor: v.name.clone(),
                name: tag_name(&v.vendor_type).to_string(),
                content: code.to_string(),
            })
        })
        .collect()
}
