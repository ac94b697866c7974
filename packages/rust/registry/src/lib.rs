//! Company registry client.
//!
//! Fetches a company record from the national business registry API by its
//! registry number and normalizes it into a [`CompanyProfile`]. This is the
//! only required source: a failed lookup fails the whole request, so errors
//! are returned verbatim with the upstream detail preserved.

mod normalize;
mod vendor;

use std::time::Duration;

use firmscope_shared::{CompanyProfile, FirmscopeError, RegistryConfig, RegistryNumber, Result};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

pub use vendor::VendorFilter;

/// Source tag attached to upstream errors.
const SOURCE: &str = "registry";

/// Upper bound on results requested from the name search.
const MAX_SEARCH_LIMIT: u32 = 100;

/// User-Agent string for registry requests.
const USER_AGENT: &str = concat!("firmscope/", env!("CARGO_PKG_VERSION"));

/// Client for the registry's REST API.
#[derive(Debug, Clone)]
pub struct RegistryClient {
    client: Client,
    endpoint: String,
}

impl RegistryClient {
    /// Create a client for the configured endpoint. Requests are single-attempt.
    pub fn new(config: &RegistryConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                FirmscopeError::upstream(SOURCE, format!("failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch and normalize the record for `registry_number`.
    ///
    /// Fails with [`FirmscopeError::NotFound`] on HTTP 404 and
    /// [`FirmscopeError::Upstream`] on any other failure.
    #[instrument(skip_all, fields(registry_number = %registry_number))]
    pub async fn fetch(&self, registry_number: &RegistryNumber) -> Result<CompanyProfile> {
        let url = format!("{}/{registry_number}", self.endpoint);
        info!(%url, "fetching registry record");

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| FirmscopeError::upstream(SOURCE, format!("{url}: {e}")))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(FirmscopeError::NotFound {
                registry_number: registry_number.to_string(),
            });
        }

        let body = read_json(response, &url).await?;
        if body.is_null() {
            return Err(FirmscopeError::NotFound {
                registry_number: registry_number.to_string(),
            });
        }

        let profile = normalize::normalize_record(body, Some(registry_number))?;
        info!(name = %profile.name, status = %profile.status, "registry record normalized");
        Ok(profile)
    }

    /// Search companies by name, normalizing every hit the same way as [`fetch`](Self::fetch).
    ///
    /// Hits without a usable registry number are skipped.
    #[instrument(skip_all, fields(name = %name, limit = limit))]
    pub async fn search(&self, name: &str, limit: u32) -> Result<Vec<CompanyProfile>> {
        let name = name.trim();
        if name.is_empty() {
            return Err(FirmscopeError::validation("search name must not be empty"));
        }
        if limit == 0 {
            return Err(FirmscopeError::validation("search limit must be at least 1"));
        }
        let limit = limit.min(MAX_SEARCH_LIMIT);

        let response = self
            .client
            .get(&self.endpoint)
            .header(reqwest::header::ACCEPT, "application/json")
            .query(&[
                ("obchodniJmeno", name.to_string()),
                ("start", "0".to_string()),
                ("pocet", limit.to_string()),
            ])
            .send()
            .await
            .map_err(|e| FirmscopeError::upstream(SOURCE, format!("{}: {e}", self.endpoint)))?;

        let body = read_json(response, &self.endpoint).await?;

        let Some(records) = body.get("ekonomickeSubjekty").and_then(Value::as_array) else {
            debug!("search response has no result list");
            return Ok(Vec::new());
        };

        let profiles: Vec<CompanyProfile> = records
            .iter()
            .cloned()
            .filter_map(|record| match normalize::normalize_record(record, None) {
                Ok(profile) => Some(profile),
                Err(e) => {
                    warn!(error = %e, "skipping unusable search hit");
                    None
                }
            })
            .collect();

        info!(results = profiles.len(), "registry search completed");
        Ok(profiles)
    }
}

/// Check the status and decode the body, keeping upstream error text.
async fn read_json(response: reqwest::Response, url: &str) -> Result<Value> {
    let status = response.status();
    if !status.is_success() {
        let detail = response.text().await.unwrap_or_default();
        return Err(FirmscopeError::upstream(
            SOURCE,
            format!("{url}: HTTP {status}: {}", detail.trim()),
        ));
    }

    response
        .json::<Value>()
        .await
        .map_err(|e| FirmscopeError::upstream(SOURCE, format!("{url}: invalid JSON body: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use firmscope_shared::{CompanyStatus, NOT_PROVIDED};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> RegistryClient {
        RegistryClient::new(&RegistryConfig {
            endpoint: format!("{}/ekonomicke-subjekty", server.uri()),
            timeout_secs: 2,
            ..RegistryConfig::default()
        })
        .unwrap()
    }

    fn ico(value: &str) -> RegistryNumber {
        RegistryNumber::parse(value).unwrap()
    }

    #[tokio::test]
    async fn fetch_minimal_record() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/ekonomicke-subjekty/27082440"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "obchodniJmeno": "Alza.cz a.s.",
                "ico": "27082440"
            })))
            .mount(&server)
            .await;

        let profile = client_for(&server).fetch(&ico("27082440")).await.unwrap();

        assert_eq!(profile.name, "Alza.cz a.s.");
        assert_eq!(profile.status, CompanyStatus::Active);
        assert_eq!(profile.address, NOT_PROVIDED);
    }

    #[tokio::test]
    async fn fetch_404_is_not_found() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/ekonomicke-subjekty/12345678"))
            .respond_with(ResponseTemplate::new(404).set_body_string("{\"kod\":\"NENALEZENO\"}"))
            .mount(&server)
            .await;

        let err = client_for(&server).fetch(&ico("12345678")).await.unwrap_err();

        assert!(matches!(err, FirmscopeError::NotFound { .. }));
        assert!(err.to_string().contains("12345678"));
    }

    #[tokio::test]
    async fn fetch_server_error_keeps_upstream_text() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance window"))
            .mount(&server)
            .await;

        let err = client_for(&server).fetch(&ico("27082440")).await.unwrap_err();

        match err {
            FirmscopeError::Upstream { source_name, message } => {
                assert_eq!(source_name, "registry");
                assert!(message.contains("503"));
                assert!(message.contains("maintenance window"));
            }
            other => panic!("expected Upstream, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn fetch_unreachable_host_is_upstream_error() {
        let client = RegistryClient::new(&RegistryConfig {
            endpoint: "http://127.0.0.1:9".into(),
            timeout_secs: 1,
            ..RegistryConfig::default()
        })
        .unwrap();

        let err = client.fetch(&ico("27082440")).await.unwrap_err();
        assert!(matches!(err, FirmscopeError::Upstream { .. }));
    }

    #[tokio::test]
    async fn search_normalizes_each_hit() {
        let server = MockServer::start().await;
        let body = std::fs::read_to_string("../../../fixtures/json/registry-search.json")
            .expect("read search fixture");

        Mock::given(method("GET"))
            .and(path("/ekonomicke-subjekty"))
            .and(query_param("obchodniJmeno", "Alza"))
            .and(query_param("pocet", "10"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&server)
            .await;

        let profiles = client_for(&server).search("Alza", 10).await.unwrap();

        // The third hit has no registry number and is skipped.
        assert_eq!(profiles.len(), 2);
        assert_eq!(profiles[0].address, ", Praha , 17000");
        assert_eq!(profiles[1].status, CompanyStatus::Terminated);
    }

    #[tokio::test]
    async fn search_without_result_list_is_empty() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/ekonomicke-subjekty"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let profiles = client_for(&server).search("Nikdo", 5).await.unwrap();
        assert!(profiles.is_empty());
    }

    #[tokio::test]
    async fn search_rejects_blank_name() {
        let client = RegistryClient::new(&RegistryConfig::default()).unwrap();
        let err = client.search("   ", 10).await.unwrap_err();
        assert!(matches!(err, FirmscopeError::Validation { .. }));
    }
}
