//! Row-by-row pass over the document listing table.

use firmscope_shared::DiscoveredDocument;
use tracing::debug;

use super::{ExtractionPass, PassContext, classify_row, extract_year};
use crate::page::ListingPage;

/// Reads documents from table rows and listing items.
///
/// A row qualifies when its text names an annual report or financial
/// statement, it links to a document, and it mentions a year inside the
/// window. The title comes from the link text, else the row's first cell.
pub struct StructuralPass;

impl ExtractionPass for StructuralPass {
    fn name(&self) -> &str {
        "structural"
    }

    fn extract(&self, page: &ListingPage, ctx: &PassContext<'_>) -> Vec<DiscoveredDocument> {
        let mut documents = Vec::new();

        for row in page.rows() {
            let text = row.text_lower();
            let Some(document_type) = classify_row(&text, ctx.vocabulary) else {
                continue;
            };
            let Some(link) = row.first_link_matching(&ctx.vocabulary.link_markers) else {
                continue;
            };
            let Some(year) = extract_year(&text) else {
                continue;
            };
            if !ctx.window.contains(year) {
                debug!(year, "row outside year window");
                continue;
            }
            let Some(url) = ctx.resolver.resolve(link.href) else {
                continue;
            };

            let title = if link.text.is_empty() {
                row.first_cell_text()
                    .unwrap_or_else(|| format!("{} {year}", document_type.label()))
            } else {
                link.text
            };

            documents.push(DiscoveredDocument {
                title,
                url,
                year,
                document_type,
            });
        }

        documents
    }
}
