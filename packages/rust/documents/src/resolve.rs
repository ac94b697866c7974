//! Href resolution against the registry site.

use firmscope_shared::{FirmscopeError, Result};
use url::Url;

/// Turns hrefs found in registry markup into absolute URLs.
///
/// - absolute `http(s)` hrefs pass through unchanged
/// - hrefs starting with `/` resolve against the site origin
/// - anything else resolves against the lookup endpoint's directory
///
/// Protocol-relative (`//host/..`) and query-only (`?..`) hrefs follow the
/// usual URL join rules against those bases.
#[derive(Debug, Clone)]
pub struct HrefResolver {
    origin: Url,
    base: Url,
}

impl HrefResolver {
    /// Build a resolver from the detail-lookup endpoint URL.
    pub fn for_lookup_url(lookup_url: &str) -> Result<Self> {
        let lookup = Url::parse(lookup_url).map_err(|e| {
            FirmscopeError::config(format!("invalid documents.lookup_url {lookup_url:?}: {e}"))
        })?;
        if lookup.cannot_be_a_base() {
            return Err(FirmscopeError::config(format!(
                "documents.lookup_url {lookup_url:?} cannot be used as a base URL"
            )));
        }

        let origin = lookup
            .join("/")
            .map_err(|e| FirmscopeError::config(format!("lookup URL has no origin: {e}")))?;
        let base = lookup
            .join("./")
            .map_err(|e| FirmscopeError::config(format!("lookup URL has no base path: {e}")))?;

        Ok(Self { origin, base })
    }

    /// Directory of the lookup endpoint, always ending in `/`.
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Resolve `href`, or `None` for fragments, script links and other
    /// hrefs that cannot point at a document.
    pub fn resolve(&self, href: &str) -> Option<String> {
        let href = href.trim();
        if href.is_empty() || href.starts_with('#') {
            return None;
        }

        if let Ok(absolute) = Url::parse(href) {
            return matches!(absolute.scheme(), "http" | "https").then(|| href.to_string());
        }

        let base = if href.starts_with('/') {
            &self.origin
        } else {
            &self.base
        };
        base.join(href).ok().map(String::from)
    }
}
