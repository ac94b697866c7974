//! Annual report and financial statement discovery.
//!
//! Documents are scraped from the public collection of deeds in two hops:
//! a detail lookup by registry number locates the company's document listing,
//! then the listing is scanned by independent [`ExtractionPass`]es whose
//! results are merged on (fiscal year, document type).
//!
//! Everything here is best effort. Network and markup failures never escape;
//! they surface as [`Outcome::Degraded`] and callers carry on without documents.

pub mod page;
pub mod passes;
pub mod placeholder;
pub mod resolve;

use std::time::Duration;

use firmscope_shared::{
    DiscoveredDocument, DocumentVocabulary, DocumentsConfig, FirmscopeError, Outcome,
    RegistryNumber, Result,
};
use reqwest::Client;
use tracing::{debug, info, instrument, warn};
use url::Url;

pub use page::ListingPage;
pub use passes::{
    BroadLinkPass, ExtractionPass, PassContext, StructuralPass, YearWindow, merge_by_key,
    merge_documents,
};
pub use placeholder::{DEMO_MARKER, DemoPlaceholders, PlaceholderProvider};
pub use resolve::HrefResolver;

/// Source tag attached to upstream errors.
const SOURCE: &str = "documents";

/// Maximum number of redirects to follow on either hop.
const MAX_REDIRECTS: usize = 5;

/// User-Agent string for scraping requests.
const USER_AGENT: &str = concat!("firmscope/", env!("CARGO_PKG_VERSION"));

/// Scraper for the collection-of-deeds registry site.
pub struct DocumentScraper {
    client: Client,
    lookup_url: Url,
    resolver: HrefResolver,
    vocabulary: DocumentVocabulary,
    passes: Vec<Box<dyn ExtractionPass>>,
}

impl DocumentScraper {
    /// Create a scraper running the default structural and broad-link passes.
    pub fn new(config: &DocumentsConfig) -> Result<Self> {
        let lookup_url = Url::parse(&config.lookup_url).map_err(|e| {
            FirmscopeError::config(format!(
                "invalid documents.lookup_url {:?}: {e}",
                config.lookup_url
            ))
        })?;
        let resolver = HrefResolver::for_lookup_url(&config.lookup_url)?;

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                FirmscopeError::upstream(SOURCE, format!("failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            client,
            lookup_url,
            resolver,
            vocabulary: config.vocabulary.clone(),
            passes: passes::default_passes(),
        })
    }

    /// Replace the extraction passes. Earlier passes win deduplication.
    pub fn with_passes(mut self, passes: Vec<Box<dyn ExtractionPass>>) -> Self {
        self.passes = passes;
        self
    }

    /// Discover documents from the last `lookback_years` years, newest first.
    pub async fn discover(
        &self,
        registry_number: &RegistryNumber,
        lookback_years: u32,
    ) -> Outcome<Vec<DiscoveredDocument>> {
        self.discover_within(registry_number, YearWindow::ending_now(lookback_years))
            .await
    }

    /// Discover documents whose fiscal year falls inside `window`.
    ///
    /// A company with no document listing is a genuine empty result;
    /// any failure along the way degrades.
    #[instrument(skip_all, fields(registry_number = %registry_number, oldest = window.oldest()))]
    pub async fn discover_within(
        &self,
        registry_number: &RegistryNumber,
        window: YearWindow,
    ) -> Outcome<Vec<DiscoveredDocument>> {
        let listing_url = match self.locate(registry_number).await {
            Ok(Some(url)) => url,
            Ok(None) => {
                info!("company has no document listing");
                return Outcome::Ok(Vec::new());
            }
            Err(e) => {
                warn!(error = %e, "document listing lookup failed");
                return Outcome::degraded(e.to_string());
            }
        };

        let markup = match self.fetch_html(&listing_url).await {
            Ok(markup) => markup,
            Err(e) => {
                warn!(error = %e, url = %listing_url, "document listing fetch failed");
                return Outcome::degraded(e.to_string());
            }
        };

        let documents = self.extract(&markup, window);
        info!(
            documents = documents.len(),
            url = %listing_url,
            "document discovery completed"
        );
        Outcome::Ok(documents)
    }

    /// Phase A: find the absolute URL of the company's document listing.
    async fn locate(&self, registry_number: &RegistryNumber) -> Result<Option<String>> {
        let mut url = self.lookup_url.clone();
        url.query_pairs_mut()
            .append_pair("ico", registry_number.as_str());

        let markup = self.fetch_html(url.as_str()).await?;
        Ok(self.locate_in(&markup))
    }

    /// Listing URL named by a lookup result page, if any.
    pub fn locate_in(&self, markup: &str) -> Option<String> {
        let page = ListingPage::parse(markup);
        let href = page.first_href_containing(&self.vocabulary.listing_marker)?;
        debug!(href, "found document listing link");
        self.resolver.resolve(href)
    }

    /// Phase B: run every pass over a listing page and merge the results.
    pub fn extract(&self, markup: &str, window: YearWindow) -> Vec<DiscoveredDocument> {
        let page = ListingPage::parse(markup);
        let ctx = PassContext {
            resolver: &self.resolver,
            window,
            vocabulary: &self.vocabulary,
        };

        let batches: Vec<Vec<DiscoveredDocument>> = self
            .passes
            .iter()
            .map(|pass| {
                let found = pass.extract(&page, &ctx);
                debug!(pass = pass.name(), candidates = found.len(), "extraction pass finished");
                found
            })
            .collect();

        merge_documents(batches)
    }

    async fn fetch_html(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
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

        response.text().await.map_err(|e| {
            FirmscopeError::upstream(SOURCE, format!("{url}: failed to read body: {e}"))
        })
    }
}
