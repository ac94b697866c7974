//! Core domain types shared by the registry, document and procurement sources.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{FirmscopeError, Result};

/// Rendered in place of any structured field the upstream record left out.
pub const NOT_PROVIDED: &str = "not provided";

/// Rendered when a registry record carries no usable company name.
pub const UNKNOWN_NAME: &str = "unknown name";

// ---------------------------------------------------------------------------
// RegistryNumber
// ---------------------------------------------------------------------------

/// An 8-digit national business-registry number (IČO).
///
/// Construction validates the shape, so holding a `RegistryNumber` means the
/// value is safe to put into any upstream query.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RegistryNumber(String);

impl RegistryNumber {
    /// Number of digits in a registry number.
    pub const LEN: usize = 8;

    /// Validate and wrap a registry number. Surrounding whitespace is rejected.
    pub fn parse(value: &str) -> Result<Self> {
        if value.len() != Self::LEN || !value.bytes().all(|b| b.is_ascii_digit()) {
            return Err(FirmscopeError::validation(format!(
                "registry number must be exactly {} ASCII digits, got {value:?}",
                Self::LEN
            )));
        }
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RegistryNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for RegistryNumber {
    type Err = FirmscopeError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for RegistryNumber {
    type Error = FirmscopeError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<RegistryNumber> for String {
    fn from(value: RegistryNumber) -> Self {
        value.0
    }
}

// ---------------------------------------------------------------------------
// CompanyProfile
// ---------------------------------------------------------------------------

/// Lifecycle status of a registered company.
///
/// Serializes as `"Active"`, `"Terminated"`, or the raw upstream status text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CompanyStatus {
    Active,
    Terminated,
    /// An upstream status code with no mapping; the raw text is kept.
    Unknown(String),
}

impl fmt::Display for CompanyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => f.write_str("Active"),
            Self::Terminated => f.write_str("Terminated"),
            Self::Unknown(raw) => f.write_str(raw),
        }
    }
}

impl From<String> for CompanyStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Active" => Self::Active,
            "Terminated" => Self::Terminated,
            _ => Self::Unknown(value),
        }
    }
}

impl From<CompanyStatus> for String {
    fn from(value: CompanyStatus) -> Self {
        value.to_string()
    }
}

/// Canonical identity and context record for one company.
///
/// Built once per request from a registry response and never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyProfile {
    pub registry_number: RegistryNumber,
    pub tax_id: Option<String>,
    pub name: String,
    pub legal_form: String,
    pub address: String,
    pub status: CompanyStatus,
    /// ISO date as published by the registry, or [`NOT_PROVIDED`].
    pub date_established: String,
    pub date_terminated: Option<String>,
    pub industry_code: Option<String>,
    pub industry_description: String,
    /// The untouched upstream record, for downstream analysis.
    pub raw: serde_json::Value,
}

// ---------------------------------------------------------------------------
// DiscoveredDocument
// ---------------------------------------------------------------------------

/// Kind of filing found in the collection of deeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    AnnualReport,
    FinancialStatement,
}

impl DocumentType {
    /// Localized label used when a document has no display text of its own.
    pub fn label(&self) -> &'static str {
        match self {
            Self::AnnualReport => "Výroční zpráva",
            Self::FinancialStatement => "Účetní závěrka",
        }
    }
}

/// An annual report or financial statement found on the registry detail page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveredDocument {
    pub title: String,
    /// Always absolute.
    pub url: String,
    pub year: i32,
    #[serde(rename = "type")]
    pub document_type: DocumentType,
}

/// Boundary view of a company's discovered documents.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSummary {
    pub total_documents: usize,
    pub years: Vec<i32>,
    pub has_recent_documents: bool,
    pub documents: Vec<DiscoveredDocument>,
}

impl DocumentSummary {
    pub fn from_documents(documents: Vec<DiscoveredDocument>) -> Self {
        Self {
            total_documents: documents.len(),
            years: documents.iter().map(|d| d.year).collect(),
            has_recent_documents: !documents.is_empty(),
            documents,
        }
    }
}

// ---------------------------------------------------------------------------
// ProcurementContract
// ---------------------------------------------------------------------------

/// Normalized state of a public contract.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContractStatus {
    Active,
    Completed,
    Cancelled,
    Planned,
    #[default]
    Unknown,
}

/// The contracting authority of a public contract.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractCustomer {
    pub name: Option<String>,
    pub registry_number: Option<String>,
}

/// A normalized public contract or tender record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcurementContract {
    pub id: String,
    pub title: String,
    pub description: String,
    pub price: Option<f64>,
    pub currency: String,
    pub status: ContractStatus,
    pub date_published: Option<String>,
    pub deadline: Option<String>,
    pub customer: ContractCustomer,
    pub url: String,
    pub categories: Vec<String>,
    pub is_active: bool,
    pub raw: serde_json::Value,
}

/// Boundary view of a company's procurement context.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcurementSummary {
    pub total_contracts: usize,
    pub active_tenders: usize,
    pub it_contracts: usize,
    pub has_active_opportunities: bool,
    pub contracts: Vec<ProcurementContract>,
}

impl ProcurementSummary {
    pub fn from_contracts(contracts: Vec<ProcurementContract>) -> Self {
        let active_tenders = contracts.iter().filter(|c| c.is_active).count();
        let it_contracts = contracts
            .iter()
            .filter(|c| {
                c.categories.iter().any(|cat| {
                    let cat = cat.to_lowercase();
                    cat.contains("software") || cat.contains("it")
                })
            })
            .count();

        Self {
            total_contracts: contracts.len(),
            active_tenders,
            it_contracts,
            has_active_opportunities: active_tenders > 0,
            contracts,
        }
    }
}

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// Result of querying an optional source.
///
/// `Degraded` is not an error: the source failed and the caller proceeds
/// without it. Tests can tell the two apart; callers generally should not.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Ok(T),
    Degraded { reason: String },
}

impl<T> Outcome<T> {
    pub fn degraded(reason: impl Into<String>) -> Self {
        Self::Degraded {
            reason: reason.into(),
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Self::Ok(value) => Outcome::Ok(f(value)),
            Self::Degraded { reason } => Outcome::Degraded { reason },
        }
    }
}

impl<T: Default> Outcome<T> {
    /// The value, or an empty default when the source degraded.
    pub fn into_inner_or_default(self) -> T {
        match self {
            Self::Ok(value) => value,
            Self::Degraded { .. } => T::default(),
        }
    }
}

impl<T> From<Result<T>> for Outcome<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(value) => Self::Ok(value),
            Err(e) => Self::degraded(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_number_accepts_eight_digits() {
        let ico = RegistryNumber::parse("27082440").unwrap();
        assert_eq!(ico.as_str(), "27082440");
        assert_eq!(ico.to_string(), "27082440");
    }

    #[test]
    fn registry_number_rejects_other_shapes() {
        for bad in [
            "",
            "2708244",
            "270824400",
            "2708244a",
            "27 82440",
            "２７０８２４４０",
            " 27082440",
            "27082440 ",
            "27082440\n",
            "\t27082440",
        ] {
            let err = RegistryNumber::parse(bad).unwrap_err();
            assert!(matches!(err, FirmscopeError::Validation { .. }), "{bad:?}");
        }
    }

    #[test]
    fn registry_number_deserialize_validates() {
        let ok: RegistryNumber = serde_json::from_str("\"00006947\"").unwrap();
        assert_eq!(ok.as_str(), "00006947");
        assert!(serde_json::from_str::<RegistryNumber>("\"123\"").is_err());
    }

    #[test]
    fn company_status_serializes_as_text() {
        let json = serde_json::to_string(&CompanyStatus::Terminated).unwrap();
        assert_eq!(json, "\"Terminated\"");
        let raw = serde_json::to_string(&CompanyStatus::Unknown("V_LIKVIDACI".into())).unwrap();
        assert_eq!(raw, "\"V_LIKVIDACI\"");
    }

    #[test]
    fn procurement_summary_counts() {
        let contract = |active: bool, categories: &[&str]| ProcurementContract {
            id: "1".into(),
            title: "Dodávka software".into(),
            description: String::new(),
            price: None,
            currency: "CZK".into(),
            status: ContractStatus::Unknown,
            date_published: None,
            deadline: None,
            customer: ContractCustomer::default(),
            url: String::new(),
            categories: categories.iter().map(|c| c.to_string()).collect(),
            is_active: active,
            raw: serde_json::Value::Null,
        };

        let summary = ProcurementSummary::from_contracts(vec![
            contract(true, &["Software package"]),
            contract(false, &["Stavební práce"]),
            contract(false, &[]),
        ]);

        assert_eq!(summary.total_contracts, 3);
        assert_eq!(summary.active_tenders, 1);
        assert_eq!(summary.it_contracts, 1);
        assert!(summary.has_active_opportunities);
    }

    #[test]
    fn document_summary_serializes_camel_case() {
        let summary = DocumentSummary::from_documents(vec![DiscoveredDocument {
            title: "Výroční zpráva 2024".into(),
            url: "https://or.justice.cz/ias/content/download?id=1".into(),
            year: 2024,
            document_type: DocumentType::AnnualReport,
        }]);
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["totalDocuments"], 1);
        assert_eq!(json["hasRecentDocuments"], true);
        assert_eq!(json["documents"][0]["type"], "annual_report");
    }

    #[test]
    fn outcome_degraded_yields_default() {
        let outcome: Outcome<Vec<i32>> =
            Err(FirmscopeError::upstream("contracts", "timed out")).into();
        assert!(outcome.is_degraded());
        assert!(outcome.into_inner_or_default().is_empty());

        let outcome = Outcome::Ok(vec![1, 2]).map(|v| v.len());
        assert_eq!(outcome, Outcome::Ok(2));
    }
}
