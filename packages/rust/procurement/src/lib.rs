//! Public procurement aggregation.
//!
//! Queries the public contracts search API for a company, normalizes every
//! hit into a [`ProcurementContract`] and narrows the result to contracts
//! matching the configured relevance keywords. Procurement data is optional
//! context: every failure degrades to an empty result.

mod normalize;
mod relevance;

use std::time::Duration;

use chrono::{DateTime, Utc};
use firmscope_shared::{
    FirmscopeError, Outcome, ProcurementConfig, ProcurementContract, ProcurementSummary,
    RegistryNumber, Result,
};
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use normalize::ContractShape;
pub use relevance::RelevanceFilter;

/// Source tag attached to upstream errors.
const SOURCE: &str = "procurement";

/// Largest page the contracts API is asked for.
pub const MAX_PAGE_SIZE: u32 = 50;

/// Most recently changed contracts first.
const SORT_ORDER: &str = "posledniZmena desc";

/// User-Agent string for contracts API requests.
const USER_AGENT: &str = concat!("firmscope/", env!("CARGO_PKG_VERSION"));

/// Aggregator over the public contracts search API.
#[derive(Debug, Clone)]
pub struct ProcurementAggregator {
    client: Client,
    search_url: String,
    detail_url_base: String,
    currency: String,
    page_size: u32,
    relevance: RelevanceFilter,
}

impl ProcurementAggregator {
    pub fn new(config: &ProcurementConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                FirmscopeError::upstream(SOURCE, format!("failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            client,
            search_url: config.search_url.clone(),
            detail_url_base: config.detail_url_base.clone(),
            currency: config.currency.clone(),
            page_size: config.page_size.clamp(1, MAX_PAGE_SIZE),
            relevance: RelevanceFilter::new(&config.keywords),
        })
    }

    /// Aggregate the relevant contracts of a company.
    pub async fn summary(&self, registry_number: &RegistryNumber) -> Outcome<ProcurementSummary> {
        self.contracts(registry_number, self.page_size)
            .await
            .map(ProcurementSummary::from_contracts)
    }

    /// Relevant contracts of a company, at most `limit` (capped at [`MAX_PAGE_SIZE`]).
    #[instrument(skip_all, fields(registry_number = %registry_number, limit = limit))]
    pub async fn contracts(
        &self,
        registry_number: &RegistryNumber,
        limit: u32,
    ) -> Outcome<Vec<ProcurementContract>> {
        let query = format!("ico:{registry_number}");
        let outcome = self.query(&query, limit, Utc::now()).await.map(|contracts| {
            let total = contracts.len();
            let relevant: Vec<ProcurementContract> = contracts
                .into_iter()
                .filter(|c| self.relevance.matches(c))
                .collect();
            debug!(total, relevant = relevant.len(), "relevance filter applied");
            relevant
        });

        if let Outcome::Ok(contracts) = &outcome {
            info!(contracts = contracts.len(), "procurement lookup completed");
        }
        outcome
    }

    /// Relevant contracts that are still open and carry a response deadline.
    pub async fn active_tenders(
        &self,
        registry_number: &RegistryNumber,
    ) -> Outcome<Vec<ProcurementContract>> {
        self.contracts(registry_number, MAX_PAGE_SIZE)
            .await
            .map(|contracts| {
                contracts
                    .into_iter()
                    .filter(|c| c.is_active && c.deadline.is_some())
                    .collect()
            })
    }

    /// Currently active contracts matching any of `keywords`, across all companies.
    #[instrument(skip_all, fields(keywords = keywords.len(), limit = limit))]
    pub async fn search_by_keywords(
        &self,
        keywords: &[String],
        limit: u32,
    ) -> Outcome<Vec<ProcurementContract>> {
        let terms: Vec<&str> = keywords
            .iter()
            .map(|k| k.trim())
            .filter(|k| !k.is_empty())
            .collect();
        if terms.is_empty() {
            return Outcome::Ok(Vec::new());
        }

        let query = terms.join(" OR ");
        self.query(&query, limit, Utc::now())
            .await
            .map(|contracts| contracts.into_iter().filter(|c| c.is_active).collect())
    }

    /// Run one search and normalize its hits, degrading on any failure.
    async fn query(
        &self,
        query: &str,
        limit: u32,
        now: DateTime<Utc>,
    ) -> Outcome<Vec<ProcurementContract>> {
        match self.search(query, limit.clamp(1, MAX_PAGE_SIZE)).await {
            Ok(hits) => {
                let shape = ContractShape {
                    currency: &self.currency,
                    detail_url_base: &self.detail_url_base,
                };
                Outcome::Ok(
                    hits.into_iter()
                        .map(|raw| normalize::normalize_contract(raw, &shape, now))
                        .collect(),
                )
            }
            Err(e) => {
                warn!(error = %e, query, "procurement search failed");
                Outcome::degraded(e.to_string())
            }
        }
    }

    async fn search(&self, query: &str, page_size: u32) -> Result<Vec<Value>> {
        let url = &self.search_url;
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .query(&[
                ("q", query.to_string()),
                ("sort", SORT_ORDER.to_string()),
                ("page", "1".to_string()),
                ("pageSize", page_size.to_string()),
            ])
            .send()
            .await
            .map_err(|e| FirmscopeError::upstream(SOURCE, format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FirmscopeError::upstream(
                SOURCE,
                format!("{url}: HTTP {status}"),
            ));
        }

        let body: Value = response.json().await.map_err(|e| {
            FirmscopeError::upstream(SOURCE, format!("{url}: invalid JSON body: {e}"))
        })?;

        Ok(match body.get("results") {
            Some(Value::Array(results)) => results.clone(),
            _ => {
                debug!("search response has no results list");
                Vec::new()
            }
        })
    }
}
