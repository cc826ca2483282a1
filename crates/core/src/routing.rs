//! Per-request locale routing decisions.
//!
//! Everything here is pure: the HTTP layer extracts the path, host, cookie and
//! `Accept-Language` values and applies the returned [`RouteDecision`].

use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::i18n::Locale;

pub const EXCLUDED_PREFIXES: [&str; 3] = ["/api", "/studio", "/admin"];
pub const ASSET_PREFIX: &str = "/_assets";

/// Marketing subdomains served from a division page.
pub static SUBDOMAIN_MAP: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("auto", "auto-parts"),
        ("food", "food-markets"),
        ("clothing", "clothing-lifestyle"),
        ("it", "it-hardware"),
        ("markets", "markets-trading"),
    ])
});

#[derive(Debug, Clone, Copy, Default)]
pub struct RouteRequest<'a> {
    pub path: &'a str,
    pub host: Option<&'a str>,
    pub accept_language: Option<&'a str>,
    pub cookie_locale: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// Serve the request as-is.
    Pass,
    /// Serve a different path without changing the visible URL.
    Rewrite { path: String },
    /// Send the visitor to `location` and persist `locale` in the cookie.
    Redirect { location: String, locale: Locale },
}

pub fn route(req: &RouteRequest<'_>) -> RouteDecision {
    let path = req.path;

    if is_bypassed(path) {
        return RouteDecision::Pass;
    }

    if let Some(slug) = req.host.and_then(subdomain_target) {
        if !path.starts_with(ASSET_PREFIX) {
            return RouteDecision::Rewrite {
                path: format!("/{}/divisions/{}", Locale::DEFAULT, slug),
            };
        }
    }

    let locale = detect_locale(req.cookie_locale, req.accept_language);

    if path == "/" || path.is_empty() {
        return RouteDecision::Redirect {
            location: format!("/{}", locale),
            locale,
        };
    }

    if locale_prefix(path).is_none() {
        let path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{}", path)
        };
        return RouteDecision::Redirect {
            location: format!("/{}{}", locale, path),
            locale,
        };
    }

    RouteDecision::Pass
}

pub fn is_bypassed(path: &str) -> bool {
    EXCLUDED_PREFIXES
        .iter()
        .any(|prefix| path.starts_with(prefix))
        || path.starts_with(ASSET_PREFIX)
        || has_file_extension(path)
}

/// Any dot in the path marks it as a file request, wherever it appears.
fn has_file_extension(path: &str) -> bool {
    path.contains('.')
}

/// Division slug for a `Host` header whose leading label is a marketing subdomain.
pub fn subdomain_target(host: &str) -> Option<&'static str> {
    let label = host.split('.').next().unwrap_or_default();
    SUBDOMAIN_MAP.get(label).copied()
}

/// Locale carried by the first path segment, if any.
pub fn locale_prefix(path: &str) -> Option<Locale> {
    let rest = path.strip_prefix('/')?;
    let segment = rest.split('/').next().unwrap_or_default();
    Locale::parse(segment)
}

/// Cookie first, then the primary subtag of the first `Accept-Language` entry,
/// then the default locale.
pub fn detect_locale(cookie: Option<&str>, accept_language: Option<&str>) -> Locale {
    if let Some(locale) = cookie.and_then(Locale::parse) {
        return locale;
    }

    accept_language
        .and_then(primary_language)
        .and_then(|tag| Locale::parse(&tag))
        .unwrap_or_default()
}

fn primary_language(header: &str) -> Option<String> {
    let first = header.split(',').next()?;
    let tag = first.split(';').next()?.trim();
    let primary = tag.split('-').next()?.to_ascii_lowercase();
    if primary.is_empty() {
        None
    } else {
        Some(primary)
    }
}
