use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{CheckError, CheckResult};

/// Domains whose search hits count as trusted evidence.
pub const DEFAULT_TRUSTED_SOURCES: &[&str] = &[
    "bbc.com", "reuters.com", "cnn.com", "aljazeera.com", "apnews.com", "theguardian.com", "nytimes.com",
    "washingtonpost.com", "bloomberg.com", "forbes.com", "time.com", "economist.com",
    "espn.com", "espncricinfo.com", "cricbuzz.com", "skysports.com",
    "dawn.com", "geo.tv", "tribune.com.pk", "arynews.tv", "thenews.com.pk", "92news.tv", "dunyanews.tv",
    "snopes.com", "factcheck.org", "politifact.com", "fullfact.org",
];

/// What happens to a trusted hit whose snippet neither agrees nor disagrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnsurePolicy {
    /// Keep it visible in `others`.
    #[default]
    RetainInOthers,
    /// Drop it from the evidence set entirely.
    Drop,
}

/// Tunables for evidence collection and the verdict rule.
///
/// Every field has a default, so a TOML file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckConfig {
    /// Lowercase domain substrings. Matching is case-sensitive.
    pub allowlist: Vec<String>,
    pub max_search_results: usize,
    /// Minimum agreeing trusted sources for REAL_CONFIRMED.
    pub agree_threshold: usize,
    /// Minimum disagreeing trusted sources for FAKE_CONTRADICTED.
    pub disagree_threshold: usize,
    pub model_high_confidence: f64,
    pub model_low_confidence: f64,
    pub entailment_score_threshold: f64,
    pub contradiction_score_threshold: f64,
    /// Per-call timeout for search, NLI and classifier calls.
    pub collaborator_timeout_ms: u64,
    /// Budget for a whole check; unset means no budget beyond the per-call timeouts.
    pub request_budget_ms: Option<u64>,
    /// Parallel NLI calls within one search response.
    pub nli_concurrency: usize,
    pub unsure_policy: UnsurePolicy,
    /// Cutoff for the word-similarity fallback backend.
    pub similarity_cutoff: f64,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            allowlist: DEFAULT_TRUSTED_SOURCES.iter().map(|s| s.to_string()).collect(),
            max_search_results: 10,
            agree_threshold: 2,
            disagree_threshold: 1,
            model_high_confidence: 0.6,
            model_low_confidence: 0.4,
            entailment_score_threshold: 0.5,
            contradiction_score_threshold: 0.5,
            collaborator_timeout_ms: 5_000,
            request_budget_ms: None,
            nli_concurrency: 4,
            unsure_policy: UnsurePolicy::RetainInOthers,
            similarity_cutoff: 0.60,
        }
    }
}

impl CheckConfig {
    pub fn from_toml(text: &str) -> CheckResult<Self> {
        let cfg: Self = toml::from_str(text).map_err(|e| CheckError::Config(format!("TOML parse error: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: &Path) -> CheckResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| CheckError::Config(format!("failed to read '{}': {e}", path.display())))?;
        Self::from_toml(&text)
    }

    pub fn collaborator_timeout(&self) -> Duration {
        Duration::from_millis(self.collaborator_timeout_ms)
    }

    pub fn request_budget(&self) -> Option<Duration> {
        self.request_budget_ms.map(Duration::from_millis)
    }

    pub fn validate(&self) -> CheckResult<()> {
        if self.allowlist.is_empty() || self.allowlist.iter().any(|d| d.trim().is_empty()) {
            return Err(CheckError::Config("allowlist must contain non-empty domains".into()));
        }
        for (name, value) in [
            ("model_high_confidence", self.model_high_confidence),
            ("model_low_confidence", self.model_low_confidence),
            ("entailment_score_threshold", self.entailment_score_threshold),
            ("contradiction_score_threshold", self.contradiction_score_threshold),
            ("similarity_cutoff", self.similarity_cutoff),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(CheckError::Config(format!("{name} must be in [0, 1], got {value}")));
            }
        }
        if self.model_low_confidence > self.model_high_confidence {
            return Err(CheckError::Config(format!(
                "model_low_confidence ({}) must not exceed model_high_confidence ({})",
                self.model_low_confidence, self.model_high_confidence
            )));
        }
        if self.agree_threshold < 1 || self.disagree_threshold < 1 {
            return Err(CheckError::Config("agree_threshold and disagree_threshold must be >= 1".into()));
        }
        if self.max_search_results < 1 {
            return Err(CheckError::Config("max_search_results must be >= 1".into()));
        }
        if self.nli_concurrency < 1 {
            return Err(CheckError::Config("nli_concurrency must be >= 1".into()));
        }
        if self.collaborator_timeout_ms == 0 || self.request_budget_ms == Some(0) {
            return Err(CheckError::Config("timeouts must be > 0".into()));
        }
        Ok(())
    }
}
