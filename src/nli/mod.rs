//! Natural-language-inference collaborators.
//!
//! A backend judges how an evidence text relates to a claim and reports raw
//! `(label, score)` pairs in its own label spelling. Turning those into a
//! canonical label is the job of [`crate::verification`], so backends never
//! interpret their own output.

use anyhow::Result;
use serde::{Deserialize, Serialize};

pub mod http;
pub mod llm;
pub mod similarity;

pub use http::HttpNli;
pub use llm::LlmNli;
pub use similarity::SimilarityNli;

/// One label/confidence pair exactly as a backend reported it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawLabelScore {
    pub label: String,
    pub score: f64,
}

impl RawLabelScore {
    pub fn new(label: impl Into<String>, score: f64) -> Self {
        Self { label: label.into(), score }
    }
}

#[async_trait::async_trait]
pub trait NliBackend: Send + Sync {
    async fn infer(&self, claim: &str, evidence: &str) -> Result<Vec<RawLabelScore>>;
}
