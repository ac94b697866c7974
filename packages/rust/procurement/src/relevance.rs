//! Keyword relevance filter for public contracts.

use firmscope_shared::ProcurementContract;

/// Keeps contracts whose title or description mentions any keyword.
///
/// Matching is a case-insensitive substring test, so short keywords such as
/// "it" also match inside longer words.
#[derive(Debug, Clone)]
pub struct RelevanceFilter {
    keywords: Vec<String>,
}

impl RelevanceFilter {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    pub fn matches(&self, contract: &ProcurementContract) -> bool {
        let haystack = format!("{} {}", contract.title, contract.description).to_lowercase();
        self.keywords.iter().any(|k| haystack.contains(k.as_str()))
    }
}
