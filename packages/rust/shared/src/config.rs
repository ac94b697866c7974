//! Application configuration for firmscope.
//!
//! User config lives at `~/.firmscope/firmscope.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{FirmscopeError, Result};
use crate::types::DocumentType;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "firmscope.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".firmscope";

// ---------------------------------------------------------------------------
// Config structs (matching firmscope.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Company registry API.
    #[serde(default)]
    pub registry: RegistryConfig,

    /// Collection-of-deeds scraping.
    #[serde(default)]
    pub documents: DocumentsConfig,

    /// Public contracts API.
    #[serde(default)]
    pub procurement: ProcurementConfig,
}

/// `[registry]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Base endpoint; records live at `{endpoint}/{registry_number}`.
    #[serde(default = "default_registry_endpoint")]
    pub endpoint: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_registry_timeout")]
    pub timeout_secs: u64,

    /// Industry code prefixes (CZ-NACE) that mark a company as an IT vendor.
    #[serde(default = "default_vendor_industry_prefixes")]
    pub vendor_industry_prefixes: Vec<String>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            endpoint: default_registry_endpoint(),
            timeout_secs: default_registry_timeout(),
            vendor_industry_prefixes: default_vendor_industry_prefixes(),
        }
    }
}

fn default_registry_endpoint() -> String {
    "https://ares.gov.cz/ekonomicke-subjekty-v-be/rest/ekonomicke-subjekty".into()
}
fn default_registry_timeout() -> u64 {
    10
}
fn default_vendor_industry_prefixes() -> Vec<String> {
    ["62", "6201", "6202", "6203", "6209", "63", "73", "7311", "7312"]
        .map(String::from)
        .to_vec()
}

/// `[documents]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentsConfig {
    /// Detail-lookup endpoint, queried as `{lookup_url}?ico={registry_number}`.
    /// Relative hrefs resolve against its directory, rooted hrefs against its origin.
    #[serde(default = "default_lookup_url")]
    pub lookup_url: String,

    /// Timeout in seconds, applied to each of the two requests.
    #[serde(default = "default_documents_timeout")]
    pub timeout_secs: u64,

    /// How many years back from the current year a document may be.
    #[serde(default = "default_lookback_years")]
    pub lookback_years: u32,

    /// Substitute labelled demo documents when nothing was discovered.
    #[serde(default)]
    pub demo_placeholders: bool,

    /// Markup vocabulary used by the extraction heuristics.
    #[serde(default)]
    pub vocabulary: DocumentVocabulary,
}

impl Default for DocumentsConfig {
    fn default() -> Self {
        Self {
            lookup_url: default_lookup_url(),
            timeout_secs: default_documents_timeout(),
            lookback_years: default_lookback_years(),
            demo_placeholders: false,
            vocabulary: DocumentVocabulary::default(),
        }
    }
}

fn default_lookup_url() -> String {
    "https://or.justice.cz/ias/ui/rejstrik-$firma".into()
}
fn default_documents_timeout() -> u64 {
    15
}
fn default_lookback_years() -> u32 {
    3
}

/// `[documents.vocabulary]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentVocabulary {
    /// Path fragment identifying the link to the document listing.
    #[serde(default = "default_listing_marker")]
    pub listing_marker: String,

    /// Href fragments that identify a downloadable document.
    #[serde(default = "default_link_markers")]
    pub link_markers: Vec<String>,

    /// Lower-case row phrases meaning "annual report".
    #[serde(default = "default_annual_report_phrases")]
    pub annual_report_phrases: Vec<String>,

    /// Lower-case row phrases meaning "financial statement".
    #[serde(default = "default_financial_statement_phrases")]
    pub financial_statement_phrases: Vec<String>,

    /// Stems matched against PDF link text, checked in order.
    #[serde(default = "default_link_stems")]
    pub link_stems: Vec<LinkStem>,
}

impl Default for DocumentVocabulary {
    fn default() -> Self {
        Self {
            listing_marker: default_listing_marker(),
            link_markers: default_link_markers(),
            annual_report_phrases: default_annual_report_phrases(),
            financial_statement_phrases: default_financial_statement_phrases(),
            link_stems: default_link_stems(),
        }
    }
}

/// A link-text stem and the document type it implies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkStem {
    pub stem: String,
    pub document_type: DocumentType,
}

fn default_listing_marker() -> String {
    "vypis-sl".into()
}
fn default_link_markers() -> Vec<String> {
    vec![".pdf".into(), "dokument".into()]
}
fn default_annual_report_phrases() -> Vec<String> {
    vec!["výroční zpráva".into(), "ročni zprava".into()]
}
fn default_financial_statement_phrases() -> Vec<String> {
    vec!["účetní závěrka".into(), "ucteni zaverka".into()]
}
fn default_link_stems() -> Vec<LinkStem> {
    vec![
        LinkStem {
            stem: "výroční".into(),
            document_type: DocumentType::AnnualReport,
        },
        LinkStem {
            stem: "účetní".into(),
            document_type: DocumentType::FinancialStatement,
        },
        LinkStem {
            stem: "zpráva".into(),
            document_type: DocumentType::FinancialStatement,
        },
    ]
}

/// `[procurement]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcurementConfig {
    /// Contracts full-text search endpoint.
    #[serde(default = "default_search_url")]
    pub search_url: String,

    /// Public detail pages live at `{detail_url_base}/{id}`.
    #[serde(default = "default_detail_url_base")]
    pub detail_url_base: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_procurement_timeout")]
    pub timeout_secs: u64,

    /// Results requested per company lookup.
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Currency reported on every contract.
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Relevance keywords, matched case-insensitively against title + description.
    #[serde(default = "default_keywords")]
    pub keywords: Vec<String>,
}

impl Default for ProcurementConfig {
    fn default() -> Self {
        Self {
            search_url: default_search_url(),
            detail_url_base: default_detail_url_base(),
            timeout_secs: default_procurement_timeout(),
            page_size: default_page_size(),
            currency: default_currency(),
            keywords: default_keywords(),
        }
    }
}

fn default_search_url() -> String {
    "https://www.hlidacstatu.cz/api/v2/verejnezakazky/hledat".into()
}
fn default_detail_url_base() -> String {
    "https://www.hlidacstatu.cz/verejnezakazky".into()
}
fn default_procurement_timeout() -> u64 {
    15
}
fn default_page_size() -> u32 {
    20
}
fn default_currency() -> String {
    "CZK".into()
}
fn default_keywords() -> Vec<String> {
    [
        "software",
        "aplikace",
        "systém",
        "it",
        "informační",
        "digitalizace",
        "cloud",
        "web",
        "portal",
        "databáze",
        "automatizace",
        "analýza",
        "data",
        "mobilní",
        "eshop",
        "e-shop",
        "crm",
        "erp",
        "technologie",
        "programování",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.firmscope/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| FirmscopeError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.firmscope/firmscope.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| FirmscopeError::io(path, e))?;

    let config: AppConfig = toml::from_str(&content).map_err(|e| {
        FirmscopeError::config(format!("failed to parse {}: {e}", path.display()))
    })?;
    validate_config(&config)?;
    Ok(config)
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| FirmscopeError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| FirmscopeError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| FirmscopeError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Reject settings that would make every request fail.
pub fn validate_config(config: &AppConfig) -> Result<()> {
    let timeouts = [
        ("registry.timeout_secs", config.registry.timeout_secs),
        ("documents.timeout_secs", config.documents.timeout_secs),
        ("procurement.timeout_secs", config.procurement.timeout_secs),
    ];
    for (key, secs) in timeouts {
        if secs == 0 {
            return Err(FirmscopeError::config(format!("{key} must be at least 1")));
        }
    }

    if config.procurement.page_size == 0 {
        return Err(FirmscopeError::config(
            "procurement.page_size must be at least 1",
        ));
    }

    if config.documents.vocabulary.listing_marker.trim().is_empty() {
        return Err(FirmscopeError::config(
            "documents.vocabulary.listing_marker must not be empty",
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("lookup_url"));
        assert!(toml_str.contains("ekonomicke-subjekty"));
        assert!(toml_str.contains("annual_report"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.registry.timeout_secs, 10);
        assert_eq!(parsed.documents.lookback_years, 3);
        assert!(!parsed.documents.demo_placeholders);
        assert_eq!(parsed.documents.vocabulary.link_stems.len(), 3);
        assert_eq!(parsed.procurement.keywords.len(), 20);
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let toml_str = r#"
[documents]
lookback_years = 5
demo_placeholders = true

[procurement]
keywords = ["cloud", "gis"]
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.documents.lookback_years, 5);
        assert!(config.documents.demo_placeholders);
        assert_eq!(config.documents.timeout_secs, 15);
        assert_eq!(config.documents.vocabulary.listing_marker, "vypis-sl");
        assert_eq!(config.procurement.keywords, vec!["cloud", "gis"]);
        assert_eq!(config.procurement.page_size, 20);
        assert_eq!(config.registry.vendor_industry_prefixes.len(), 9);
    }

    #[test]
    fn vendor_prefixes_override() {
        let toml_str = r#"
[registry]
vendor_industry_prefixes = ["62", "58"]
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.registry.vendor_industry_prefixes, vec!["62", "58"]);
        assert_eq!(config.registry.timeout_secs, 10);
    }

    #[test]
    fn custom_link_stems_parse() {
        let toml_str = r#"
[[documents.vocabulary.link_stems]]
stem = "annual"
document_type = "annual_report"
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(
            config.documents.vocabulary.link_stems,
            vec![LinkStem {
                stem: "annual".into(),
                document_type: DocumentType::AnnualReport,
            }]
        );
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let mut config = AppConfig::default();
        config.procurement.timeout_secs = 0;
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("procurement.timeout_secs"));
    }
}
