//! Industry-code filter that picks IT vendors out of registry search hits.

use firmscope_shared::CompanyProfile;

/// Keeps companies whose industry code starts with one of the configured prefixes.
///
/// Companies without an industry code never match.
#[derive(Debug, Clone)]
pub struct VendorFilter {
    prefixes: Vec<String>,
}

impl VendorFilter {
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            prefixes: prefixes
                .into_iter()
                .map(|p| p.as_ref().trim().to_string())
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }

    pub fn matches(&self, profile: &CompanyProfile) -> bool {
        profile
            .industry_code
            .as_deref()
            .is_some_and(|code| self.prefixes.iter().any(|p| code.starts_with(p.as_str())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize_record;
    use serde_json::json;

    fn company(industry: serde_json::Value) -> CompanyProfile {
        normalize_record(
            json!({ "ico": "27082440", "obchodniJmeno": "Firma s.r.o.", "czNace": industry }),
            None,
        )
        .unwrap()
    }

    #[test]
    fn prefix_match_on_industry_code() {
        let filter = VendorFilter::new(["62", "7311"]);
        assert!(filter.matches(&company(json!(["62020"]))));
        let agency = company(json!([{ "kod": "73110", "nazev": "Reklamní agentury" }]));
        assert!(filter.matches(&agency));
        assert!(!filter.matches(&company(json!(["47910"]))));
        assert!(!filter.matches(&company(json!(["73200"]))));
    }

    #[test]
    fn missing_industry_never_matches() {
        let filter = VendorFilter::new(["62"]);
        assert!(!filter.matches(&company(json!([]))));
    }

    #[test]
    fn blank_prefixes_match_nothing() {
        let filter = VendorFilter::new(["", "  "]);
        assert!(!filter.matches(&company(json!(["62020"]))));
    }
}
