use crate::types::TrustLabel;

/// Classifies search-result links against a domain allow-list.
///
/// A link is trusted iff it contains an allow-listed domain as a substring.
/// Matching is case-sensitive and performs no URL normalisation: entries are
/// expected lowercase, and links are compared exactly as the search
/// collaborator returned them.
#[derive(Debug, Clone)]
pub struct TrustFilter {
    allowlist: Vec<String>,
}

impl TrustFilter {
    pub fn new<I, S>(allowlist: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { allowlist: allowlist.into_iter().map(Into::into).collect() }
    }

    pub fn classify(&self, link: &str) -> TrustLabel {
        if self.matched_domain(link).is_some() { TrustLabel::Trusted } else { TrustLabel::Other }
    }

    /// First allow-list entry found in `link`.
    pub fn matched_domain(&self, link: &str) -> Option<&str> {
        self.allowlist.iter().map(String::as_str).find(|d| link.contains(d))
    }

    pub fn domains(&self) -> &[String] {
        &self.allowlist
    }
}
