//! Caller-facing composition of the registry, document and procurement sources.

use serde::Serialize;
use tracing::{info, instrument, warn};

use firmscope_documents::{DemoPlaceholders, DocumentScraper, PlaceholderProvider, YearWindow};
use firmscope_procurement::ProcurementAggregator;
use firmscope_registry::{RegistryClient, VendorFilter};
use firmscope_shared::{
    AppConfig, CompanyProfile, DiscoveredDocument, DocumentSummary, FirmscopeError, Outcome,
    ProcurementContract, ProcurementSummary, RegistryNumber, Result,
};

use crate::progress::ProgressReporter;

/// A company profile together with whatever documents could be discovered.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComposedProfile {
    pub profile: CompanyProfile,
    pub documents: Vec<DiscoveredDocument>,
    pub has_documents: bool,
}

/// Orchestrates one required source and two optional ones.
///
/// Only the registry lookup can fail a request. Document and procurement
/// failures are absorbed and surface as empty collections.
pub struct ProfileComposer {
    registry: RegistryClient,
    vendors: VendorFilter,
    documents: DocumentScraper,
    procurement: ProcurementAggregator,
    placeholders: Option<Box<dyn PlaceholderProvider>>,
    lookback_years: u32,
}

impl ProfileComposer {
    /// Build every source client from `config`.
    ///
    /// Demo placeholders are installed only when `documents.demo_placeholders` is set.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let placeholders: Option<Box<dyn PlaceholderProvider>> =
            if config.documents.demo_placeholders {
                Some(Box::new(DemoPlaceholders))
            } else {
                None
            };

        Ok(Self {
            registry: RegistryClient::new(&config.registry)?,
            vendors: VendorFilter::new(&config.registry.vendor_industry_prefixes),
            documents: DocumentScraper::new(&config.documents)?,
            procurement: ProcurementAggregator::new(&config.procurement)?,
            placeholders,
            lookback_years: config.documents.lookback_years,
        })
    }

    /// Replace the placeholder strategy; `None` disables substitution.
    pub fn with_placeholders(mut self, placeholders: Option<Box<dyn PlaceholderProvider>>) -> Self {
        self.placeholders = placeholders;
        self
    }

    /// Default look-back window in years.
    pub fn lookback_years(&self) -> u32 {
        self.lookback_years
    }

    /// Validate `registry_number` and fetch its registry record.
    ///
    /// A malformed number is rejected before any network call.
    pub async fn get_company_profile(&self, registry_number: &str) -> Result<CompanyProfile> {
        let registry_number = RegistryNumber::parse(registry_number)?;
        self.registry.fetch(&registry_number).await
    }

    /// Search registry records by company name.
    pub async fn search_companies(&self, name: &str, limit: u32) -> Result<Vec<CompanyProfile>> {
        self.registry.search(name, limit).await
    }

    /// Search by name and keep only companies with an IT industry code.
    ///
    /// Invalid input is an error; an unreachable registry yields no vendors.
    #[instrument(skip_all, fields(name = %name, limit = limit))]
    pub async fn search_vendors(&self, name: &str, limit: u32) -> Result<Vec<CompanyProfile>> {
        let companies = match self.registry.search(name, limit).await {
            Ok(companies) => companies,
            Err(e @ FirmscopeError::Validation { .. }) => return Err(e),
            Err(e) => {
                warn!(error = %e, "vendor search failed, returning no vendors");
                return Ok(Vec::new());
            }
        };

        let vendors: Vec<CompanyProfile> = companies
            .into_iter()
            .filter(|company| self.vendors.matches(company))
            .collect();
        info!(vendors = vendors.len(), "vendor search completed");
        Ok(vendors)
    }

    /// Documents from the last `lookback_years` years. Never fails.
    pub async fn get_document_summary(
        &self,
        registry_number: &RegistryNumber,
        lookback_years: u32,
    ) -> DocumentSummary {
        let (documents, _) = self
            .discover_documents(registry_number, YearWindow::ending_now(lookback_years))
            .await;
        DocumentSummary::from_documents(documents)
    }

    /// Relevant public contracts of a company. Never fails.
    pub async fn get_procurement_summary(
        &self,
        registry_number: &RegistryNumber,
    ) -> ProcurementSummary {
        self.procurement
            .summary(registry_number)
            .await
            .into_inner_or_default()
    }

    /// Open tenders with a response deadline. Never fails.
    pub async fn get_active_tenders(
        &self,
        registry_number: &RegistryNumber,
    ) -> Vec<ProcurementContract> {
        self.procurement
            .active_tenders(registry_number)
            .await
            .into_inner_or_default()
    }

    /// Active contracts of any company matching one of `keywords`. Never fails.
    pub async fn search_opportunities(
        &self,
        keywords: &[String],
        limit: u32,
    ) -> Vec<ProcurementContract> {
        self.procurement
            .search_by_keywords(keywords, limit)
            .await
            .into_inner_or_default()
    }

    /// Fetch the registry record, then enrich it with discovered documents.
    #[instrument(skip_all, fields(registry_number = %registry_number))]
    pub async fn compose(
        &self,
        registry_number: &str,
        lookback_years: u32,
        progress: &dyn ProgressReporter,
    ) -> Result<ComposedProfile> {
        let registry_number = RegistryNumber::parse(registry_number)?;

        // --- Phase 1: Registry (required) ---
        progress.phase("Fetching registry record");
        let profile = self.registry.fetch(&registry_number).await?;
        progress.source_done("registry", 1, false);

        // --- Phase 2: Documents (optional) ---
        progress.phase("Discovering documents");
        let (documents, degraded) = self
            .discover_documents(&registry_number, YearWindow::ending_now(lookback_years))
            .await;
        progress.source_done("documents", documents.len(), degraded);

        info!(
            name = %profile.name,
            documents = documents.len(),
            "profile composed"
        );

        Ok(ComposedProfile {
            has_documents: !documents.is_empty(),
            profile,
            documents,
        })
    }

    /// Run discovery, substituting placeholders for an empty result when enabled.
    /// The flag reports whether discovery degraded.
    async fn discover_documents(
        &self,
        registry_number: &RegistryNumber,
        window: YearWindow,
    ) -> (Vec<DiscoveredDocument>, bool) {
        let outcome = self.documents.discover_within(registry_number, window).await;
        let degraded = outcome.is_degraded();
        let documents = match outcome {
            Outcome::Ok(documents) => documents,
            Outcome::Degraded { .. } => Vec::new(),
        };

        let documents = match &self.placeholders {
            Some(provider) if documents.is_empty() => {
                info!(degraded, "no documents discovered, using placeholders");
                provider.placeholders(&window)
            }
            _ => documents,
        };
        (documents, degraded)
    }
}
