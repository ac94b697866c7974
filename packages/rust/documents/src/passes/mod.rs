//! Extraction passes over a parsed listing page.
//!
//! Each pass turns raw page candidates into [`DiscoveredDocument`]s on its own;
//! [`merge_documents`] unions their output under the (year, type) key.

mod broad;
mod structural;

use std::collections::HashSet;
use std::hash::Hash;
use std::sync::LazyLock;

use chrono::Datelike;
use firmscope_shared::{DiscoveredDocument, DocumentType, DocumentVocabulary};
use regex::Regex;

use crate::page::ListingPage;
use crate::resolve::HrefResolver;

pub use broad::BroadLinkPass;
pub use structural::StructuralPass;

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Everything a pass needs besides the page itself.
pub struct PassContext<'a> {
    pub resolver: &'a HrefResolver,
    pub window: YearWindow,
    pub vocabulary: &'a DocumentVocabulary,
}

/// One strategy for finding documents in a listing page.
///
/// Passes are pure: same page and context, same output.
pub trait ExtractionPass: Send + Sync {
    /// Human-readable pass name for tracing.
    fn name(&self) -> &str;

    /// Documents this pass recognizes, in page order, not yet deduplicated.
    fn extract(&self, page: &ListingPage, ctx: &PassContext<'_>) -> Vec<DiscoveredDocument>;
}

/// The built-in passes, structural first so its finds win the merge.
pub fn default_passes() -> Vec<Box<dyn ExtractionPass>> {
    vec![Box::new(StructuralPass), Box::new(BroadLinkPass)]
}

// ---------------------------------------------------------------------------
// Year window
// ---------------------------------------------------------------------------

/// Inclusive range of fiscal years `[current - lookback, current]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearWindow {
    pub current: i32,
    pub lookback: u32,
}

impl YearWindow {
    pub fn new(current: i32, lookback: u32) -> Self {
        Self { current, lookback }
    }

    /// Window ending at the current calendar year (UTC).
    pub fn ending_now(lookback: u32) -> Self {
        Self::new(chrono::Utc::now().year(), lookback)
    }

    pub fn oldest(&self) -> i32 {
        self.current.saturating_sub_unsigned(self.lookback)
    }

    pub fn contains(&self, year: i32) -> bool {
        (self.oldest()..=self.current).contains(&year)
    }
}

// ---------------------------------------------------------------------------
// Shared heuristics
// ---------------------------------------------------------------------------

static YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"20[0-9]{2}").expect("year regex"));

/// First `20xx` token in `text`.
pub(crate) fn extract_year(text: &str) -> Option<i32> {
    YEAR_RE.find(text).and_then(|m| m.as_str().parse().ok())
}

/// Document type named by a lower-cased row text, annual report first.
pub(crate) fn classify_row(text: &str, vocabulary: &DocumentVocabulary) -> Option<DocumentType> {
    if contains_any(text, &vocabulary.annual_report_phrases) {
        Some(DocumentType::AnnualReport)
    } else if contains_any(text, &vocabulary.financial_statement_phrases) {
        Some(DocumentType::FinancialStatement)
    } else {
        None
    }
}

/// Document type implied by the first matching stem in lower-cased link text.
pub(crate) fn classify_link_text(
    text: &str,
    vocabulary: &DocumentVocabulary,
) -> Option<DocumentType> {
    vocabulary
        .link_stems
        .iter()
        .find(|s| text.contains(&s.stem.to_lowercase()))
        .map(|s| s.document_type)
}

fn contains_any(text: &str, phrases: &[String]) -> bool {
    phrases.iter().any(|p| text.contains(&p.to_lowercase()))
}

// ---------------------------------------------------------------------------
// Merge
// ---------------------------------------------------------------------------

/// Flatten `batches` in order, keeping the first item seen for each key.
pub fn merge_by_key<T, K, I>(batches: impl IntoIterator<Item = I>, key: impl Fn(&T) -> K) -> Vec<T>
where
    I: IntoIterator<Item = T>,
    K: Eq + Hash,
{
    let mut seen = HashSet::new();
    batches
        .into_iter()
        .flatten()
        .filter(|item| seen.insert(key(item)))
        .collect()
}

/// Deduplicate on (year, type) and order by fiscal year, newest first.
pub fn merge_documents(
    batches: impl IntoIterator<Item = Vec<DiscoveredDocument>>,
) -> Vec<DiscoveredDocument> {
    let mut documents = merge_by_key(batches, |d: &DiscoveredDocument| (d.year, d.document_type));
    // Stable: equal years keep first-seen order.
    documents.sort_by(|a, b| b.year.cmp(&a.year));
    documents
}
