//! Stand-in documents for sources that have nothing indexed yet.

use firmscope_shared::{DiscoveredDocument, DocumentType};

use crate::passes::YearWindow;

/// Marker appended to every placeholder title.
pub const DEMO_MARKER: &str = "(DEMO)";

/// Publicly hosted dummy PDF the demo documents point at.
const DEMO_PDF_URL: &str =
    "https://www.w3.org/WAI/ER/tests/xhtml/testfiles/resources/pdf/dummy.pdf";

/// Supplies documents to show when discovery found none.
///
/// Only consulted when explicitly enabled; a real empty result must never be
/// silently replaced.
pub trait PlaceholderProvider: Send + Sync {
    fn placeholders(&self, window: &YearWindow) -> Vec<DiscoveredDocument>;
}

/// Three labelled demo documents for the years before the current one.
pub struct DemoPlaceholders;

impl PlaceholderProvider for DemoPlaceholders {
    fn placeholders(&self, window: &YearWindow) -> Vec<DiscoveredDocument> {
        let kinds = [
            DocumentType::AnnualReport,
            DocumentType::FinancialStatement,
            DocumentType::AnnualReport,
        ];

        (1..)
            .map(|offset| window.current - offset)
            .zip(kinds)
            .filter(|(year, _)| window.contains(*year))
            .map(|(year, document_type)| DiscoveredDocument {
                title: format!("{} za rok {year} {DEMO_MARKER}", document_type.label()),
                url: DEMO_PDF_URL.into(),
                year,
                document_type,
            })
            .collect()
    }
}
