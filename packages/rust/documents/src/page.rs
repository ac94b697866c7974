//! Parsed registry markup and the raw candidates the extraction passes read.
//!
//! Candidate iterators are lazy and borrow the parsed document, so a page can
//! be scanned any number of times without re-parsing.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

/// Row-like containers that may describe one filed document.
static ROW_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("tr, .document-row, .item").expect("row selector"));

static LINK_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("link selector"));

static CELL_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td").expect("cell selector"));

/// A parsed registry page.
pub struct ListingPage {
    html: Html,
}

impl ListingPage {
    pub fn parse(markup: &str) -> Self {
        Self {
            html: Html::parse_document(markup),
        }
    }

    /// Every row-like element, in document order.
    pub fn rows(&self) -> impl Iterator<Item = RowCandidate<'_>> + '_ {
        self.html.select(&ROW_SEL).map(|element| RowCandidate { element })
    }

    /// Every anchor whose href points at a PDF, in document order.
    pub fn pdf_anchors(&self) -> impl Iterator<Item = AnchorCandidate<'_>> + '_ {
        self.html
            .select(&LINK_SEL)
            .map(AnchorCandidate::from_element)
            .filter(|anchor| anchor.href_contains(".pdf"))
    }

    /// Href of the first anchor whose target contains `marker`.
    pub fn first_href_containing(&self, marker: &str) -> Option<&str> {
        self.html
            .select(&LINK_SEL)
            .filter_map(|el| el.value().attr("href"))
            .find(|href| href.contains(marker))
    }
}

/// A table row or listing item.
#[derive(Clone, Copy)]
pub struct RowCandidate<'a> {
    element: ElementRef<'a>,
}

impl<'a> RowCandidate<'a> {
    /// Lower-cased text content with whitespace collapsed.
    pub fn text_lower(&self) -> String {
        collapse_whitespace(&self.element.text().collect::<String>()).to_lowercase()
    }

    /// First descendant link whose href contains any of `markers`.
    pub fn first_link_matching(&self, markers: &[String]) -> Option<AnchorCandidate<'a>> {
        self.element
            .select(&LINK_SEL)
            .map(AnchorCandidate::from_element)
            .find(|anchor| markers.iter().any(|m| anchor.href_contains(m)))
    }

    /// Trimmed text of the first cell, if the row has one.
    pub fn first_cell_text(&self) -> Option<String> {
        self.element
            .select(&CELL_SEL)
            .next()
            .map(|cell| collapse_whitespace(&cell.text().collect::<String>()))
            .filter(|text| !text.is_empty())
    }
}

/// A hyperlink and its display text.
#[derive(Debug, Clone)]
pub struct AnchorCandidate<'a> {
    pub href: &'a str,
    /// Trimmed, whitespace-collapsed link text (may be empty).
    pub text: String,
}

impl<'a> AnchorCandidate<'a> {
    fn from_element(element: ElementRef<'a>) -> Self {
        Self {
            href: element.value().attr("href").unwrap_or_default(),
            text: collapse_whitespace(&element.text().collect::<String>()),
        }
    }

    fn href_contains(&self, marker: &str) -> bool {
        self.href.to_lowercase().contains(&marker.to_lowercase())
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
