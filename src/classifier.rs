use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use reqwest::Client;
use serde::Deserialize;

use crate::error::CheckError;

/// Pre-trained fake/real text classifier.
#[async_trait::async_trait]
pub trait Classifier: Send + Sync {
    /// Probability in [0, 1] that `text` is real news.
    async fn predict_probability_real(&self, text: &str) -> Result<f64>;
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PredictResp {
    Single { probability_real: f64 },
    /// `[p_fake, p_real]`, as `predict_proba` returns it.
    Pair { probabilities: Vec<f64> },
}

impl PredictResp {
    fn probability_real(self) -> Result<f64> {
        match self {
            PredictResp::Single { probability_real } => Ok(probability_real),
            PredictResp::Pair { probabilities } => match probabilities.as_slice() {
                [_, real] => Ok(*real),
                other => Err(anyhow!("expected [p_fake, p_real], got {} values", other.len())),
            },
        }
    }
}

/// Classifier served over HTTP: `POST {"text": ...}`.
pub struct HttpClassifier {
    http: Client,
    url: String,
}

impl HttpClassifier {
    pub fn new(url: String, timeout_ms: u64) -> Result<Self> {
        let http = Client::builder().timeout(Duration::from_millis(timeout_ms)).build()?;
        Ok(Self { http, url })
    }
}

#[async_trait::async_trait]
impl Classifier for HttpClassifier {
    async fn predict_probability_real(&self, text: &str) -> Result<f64> {
        self.http
            .post(&self.url)
            .json(&serde_json::json!({ "text": text }))
            .send().await?
            .error_for_status()?
            .json::<PredictResp>().await?
            .probability_real()
    }
}

/// Optional classifier signal for the verdict.
///
/// `score` is `None` when no classifier is configured, when the call fails or
/// times out, and when the value is not a probability.
pub struct ModelScorer {
    classifier: Option<Arc<dyn Classifier>>,
    timeout: Duration,
}

impl ModelScorer {
    pub fn new(classifier: Option<Arc<dyn Classifier>>, timeout: Duration) -> Self {
        Self { classifier, timeout }
    }

    pub fn disabled() -> Self {
        Self::new(None, Duration::ZERO)
    }

    pub fn is_enabled(&self) -> bool {
        self.classifier.is_some()
    }

    pub async fn score(&self, claim: &str) -> Option<f64> {
        let classifier = self.classifier.as_ref()?;
        let err = match tokio::time::timeout(self.timeout, classifier.predict_probability_real(claim)).await {
            Ok(Ok(p)) if p.is_finite() && (0.0..=1.0).contains(&p) => return Some(p),
            Ok(Ok(p)) => CheckError::ClassifierUnavailable(format!("probability out of range: {p}")),
            Ok(Err(e)) => CheckError::ClassifierUnavailable(e.to_string()),
            Err(_) => CheckError::Timeout { budget_ms: self.timeout.as_millis() as u64 },
        };
        tracing::warn!(error = %err, "model score unavailable");
        None
    }
}
