use serde::{Deserialize, Serialize};

use crate::error::CheckError;

/// User-supplied text being checked. Never empty once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Claim(String);

impl TryFrom<String> for Claim {
    type Error = CheckError;

    fn try_from(text: String) -> Result<Self, Self::Error> {
        Claim::parse(&text)
    }
}

impl From<Claim> for String {
    fn from(claim: Claim) -> Self {
        claim.0
    }
}

impl Claim {
    /// Trims the input and rejects empty or whitespace-only text.
    pub fn parse(text: &str) -> Result<Self, CheckError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(CheckError::InvalidInput("claim must not be empty".into()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One ranked result from the search collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub link: String,
    #[serde(default)]
    pub snippet: String,
}

impl SearchHit {
    pub fn new(title: impl Into<String>, link: impl Into<String>, snippet: impl Into<String>) -> Self {
        Self { title: title.into(), link: link.into(), snippet: snippet.into() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrustLabel { Trusted, Other }

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EvidenceLabel { Agrees, Disagrees, Unsure }

/// A trusted hit annotated with what its snippet says about the claim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceItem {
    pub hit: SearchHit,
    pub label: EvidenceLabel,
}

/// One search response partitioned into agreeing, disagreeing and other hits.
///
/// Each sequence keeps the order the search collaborator returned. A hit
/// appears in at most one sequence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvidenceSet {
    pub agrees: Vec<EvidenceItem>,
    pub disagrees: Vec<EvidenceItem>,
    pub others: Vec<SearchHit>,
}

impl EvidenceSet {
    pub fn is_empty(&self) -> bool {
        self.agrees.is_empty() && self.disagrees.is_empty() && self.others.is_empty()
    }

    pub fn len(&self) -> usize {
        self.agrees.len() + self.disagrees.len() + self.others.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerdictKind {
    FakeContradicted,
    RealConfirmed,
    PossiblyReal,
    PossiblyFake,
    Unsure,
}

impl VerdictKind {
    pub fn is_fake(self) -> bool {
        matches!(self, VerdictKind::FakeContradicted | VerdictKind::PossiblyFake)
    }

    pub fn is_real(self) -> bool {
        matches!(self, VerdictKind::RealConfirmed | VerdictKind::PossiblyReal)
    }

    pub fn headline(self) -> &'static str {
        match self {
            VerdictKind::FakeContradicted => "FAKE",
            VerdictKind::RealConfirmed => "REAL",
            VerdictKind::PossiblyReal => "POSSIBLY REAL",
            VerdictKind::PossiblyFake => "POSSIBLY FAKE",
            VerdictKind::Unsure => "UNSURE",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub kind: VerdictKind,
    pub justification: String,
}

/// Everything produced for one claim: the verdict and the signals behind it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckReport {
    pub claim: Claim,
    pub verdict: Verdict,
    pub evidence: EvidenceSet,
    /// Classifier probability that the claim is real; absent when unavailable.
    pub model_score: Option<f64>,
}
