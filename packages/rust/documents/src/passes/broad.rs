//! Page-wide scan of PDF links, catching documents outside the listing table.

use firmscope_shared::DiscoveredDocument;

use super::{ExtractionPass, PassContext, classify_link_text, extract_year};
use crate::page::ListingPage;

/// Keeps any PDF link whose own text carries a document stem and a year.
pub struct BroadLinkPass;

impl ExtractionPass for BroadLinkPass {
    fn name(&self) -> &str {
        "broad-link"
    }

    fn extract(&self, page: &ListingPage, ctx: &PassContext<'_>) -> Vec<DiscoveredDocument> {
        page.pdf_anchors()
            .filter_map(|anchor| {
                let text = anchor.text.to_lowercase();
                let document_type = classify_link_text(&text, ctx.vocabulary)?;
                let year = extract_year(&text).filter(|y| ctx.window.contains(*y))?;
                let url = ctx.resolver.resolve(anchor.href)?;

                Some(DiscoveredDocument {
                    title: anchor.text,
                    url,
                    year,
                    document_type,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::passes::YearWindow;
    use crate::passes::tests::load_fixture;
    use crate::resolve::HrefResolver;
    use firmscope_shared::{DocumentType, DocumentVocabulary, LinkStem};

    fn run_with(
        page: &ListingPage,
        vocabulary: &DocumentVocabulary,
        window: YearWindow,
    ) -> Vec<DiscoveredDocument> {
        let resolver =
            HrefResolver::for_lookup_url("https://or.justice.cz/ias/ui/rejstrik-$firma").unwrap();
        let ctx = PassContext {
            resolver: &resolver,
            window,
            vocabulary,
        };
        BroadLinkPass.extract(page, &ctx)
    }

    #[test]
    fn scans_all_pdf_links() {
        let page = load_fixture("document-listing.html");
        let docs = run_with(&page, &DocumentVocabulary::default(), YearWindow::new(2025, 3));

        let found: Vec<(i32, DocumentType, &str)> = docs
            .iter()
            .map(|d| (d.year, d.document_type, d.title.as_str()))
            .collect();
        assert_eq!(
            found,
            vec![
                (2024, DocumentType::AnnualReport, "výroční zpráva 2024.pdf"),
                (2022, DocumentType::FinancialStatement, "Účetní závěrka 2022"),
                (2024, DocumentType::AnnualReport, "Výroční zpráva 2024 (kopie)"),
                (2023, DocumentType::FinancialStatement, "Zpráva auditora 2023"),
            ]
        );
    }

    #[test]
    fn report_without_annual_stem_is_financial_statement() {
        let page = ListingPage::parse(r#"<a href="/y.pdf">Zpráva auditora 2023</a>"#);
        let docs = run_with(&page, &DocumentVocabulary::default(), YearWindow::new(2025, 3));
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].document_type, DocumentType::FinancialStatement);
    }

    #[test]
    fn auditor_report_leaves_annual_slot_free() {
        let page = ListingPage::parse(
            r#"<a href="/audit.pdf">Zpráva auditora 2023</a>
               <a href="/vz.pdf">Výroční zpráva 2023</a>"#,
        );
        let docs = run_with(&page, &DocumentVocabulary::default(), YearWindow::new(2025, 3));
        let merged = crate::passes::merge_documents([docs]);

        let annual = merged
            .iter()
            .find(|d| d.document_type == DocumentType::AnnualReport)
            .expect("annual report kept");
        assert_eq!(annual.url, "https://or.justice.cz/vz.pdf");
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn link_without_year_is_skipped() {
        let page = ListingPage::parse(r#"<a href="/vz.pdf">Výroční zpráva</a>"#);
        let docs = run_with(&page, &DocumentVocabulary::default(), YearWindow::new(2025, 3));
        assert!(docs.is_empty());
    }

    #[test]
    fn non_pdf_links_are_ignored() {
        let page = ListingPage::parse(r#"<a href="/vz.html">Výroční zpráva 2024</a>"#);
        let docs = run_with(&page, &DocumentVocabulary::default(), YearWindow::new(2025, 3));
        assert!(docs.is_empty());
    }

    #[test]
    fn configured_stems_replace_defaults() {
        let vocabulary = DocumentVocabulary {
            link_stems: vec![LinkStem {
                stem: "Annual".into(),
                document_type: DocumentType::AnnualReport,
            }],
            ..DocumentVocabulary::default()
        };
        let page = ListingPage::parse(
            r#"<a href="/en.pdf">Annual report 2024</a><a href="/cz.pdf">Výroční zpráva 2024</a>"#,
        );
        let docs = run_with(&page, &vocabulary, YearWindow::new(2025, 3));
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].url, "https://or.justice.cz/en.pdf");
    }
}
