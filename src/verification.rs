use std::sync::Arc;
use std::time::Duration;

use crate::config::CheckConfig;
use crate::error::CheckError;
use crate::nli::{NliBackend, RawLabelScore};
use crate::types::EvidenceLabel;

/// Default score above which an NLI relation decides the label.
pub const ENTAILMENT_THRESHOLD: f64 = 0.5;
pub const CONTRADICTION_THRESHOLD: f64 = 0.5;

/// Canonical NLI relation between an evidence snippet and a claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NliLabel { Entailment, Neutral, Contradiction }

/// Backend label spellings. Compared ignoring ASCII case.
const LABEL_TABLE: &[(&str, NliLabel)] = &[
    ("LABEL_0", NliLabel::Entailment),
    ("LABEL_1", NliLabel::Neutral),
    ("LABEL_2", NliLabel::Contradiction),
    ("ENTAILMENT", NliLabel::Entailment),
    ("NEUTRAL", NliLabel::Neutral),
    ("CONTRADICTION", NliLabel::Contradiction),
];

impl NliLabel {
    pub fn from_raw(label: &str) -> Option<Self> {
        let label = label.trim();
        LABEL_TABLE.iter().find(|(raw, _)| raw.eq_ignore_ascii_case(label)).map(|(_, l)| *l)
    }
}

/// Per-relation confidences after label mapping; unreported relations are 0.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NliScores {
    pub entailment: f64,
    pub neutral: f64,
    pub contradiction: f64,
}

impl NliScores {
    /// Maps raw backend output through [`LABEL_TABLE`]. Unknown labels are
    /// skipped; `None` when nothing was recognised.
    pub fn from_raw(raw: &[RawLabelScore]) -> Option<Self> {
        let mut scores = NliScores::default();
        let mut recognised = false;
        for item in raw {
            let Some(label) = NliLabel::from_raw(&item.label) else { continue };
            recognised = true;
            match label {
                NliLabel::Entailment => scores.entailment = item.score,
                NliLabel::Neutral => scores.neutral = item.score,
                NliLabel::Contradiction => scores.contradiction = item.score,
            }
        }
        recognised.then_some(scores)
    }
}

/// Labels a trusted snippet as agreeing, disagreeing or unsure about a claim.
///
/// Never fails: a blank snippet, a missing backend, a backend error, a
/// timeout or unrecognised output all yield `Unsure`.
pub struct EvidenceClassifier {
    nli: Option<Arc<dyn NliBackend>>,
    entailment_threshold: f64,
    contradiction_threshold: f64,
    timeout: Duration,
}

impl EvidenceClassifier {
    pub fn new(nli: Option<Arc<dyn NliBackend>>, timeout: Duration) -> Self {
        Self {
            nli,
            entailment_threshold: ENTAILMENT_THRESHOLD,
            contradiction_threshold: CONTRADICTION_THRESHOLD,
            timeout,
        }
    }

    pub fn from_config(nli: Option<Arc<dyn NliBackend>>, cfg: &CheckConfig) -> Self {
        Self::new(nli, cfg.collaborator_timeout())
            .with_thresholds(cfg.entailment_score_threshold, cfg.contradiction_score_threshold)
    }

    pub fn with_thresholds(mut self, entailment: f64, contradiction: f64) -> Self {
        self.entailment_threshold = entailment;
        self.contradiction_threshold = contradiction;
        self
    }

    /// Entailment is checked first, so a (degenerate) output above both
    /// thresholds agrees.
    pub fn label_for(&self, scores: &NliScores) -> EvidenceLabel {
        if scores.entailment > self.entailment_threshold {
            EvidenceLabel::Agrees
        } else if scores.contradiction > self.contradiction_threshold {
            EvidenceLabel::Disagrees
        } else {
            EvidenceLabel::Unsure
        }
    }

    pub async fn classify(&self, claim: &str, snippet: &str) -> EvidenceLabel {
        if snippet.trim().is_empty() {
            return EvidenceLabel::Unsure;
        }
        let Some(nli) = &self.nli else { return EvidenceLabel::Unsure };

        let raw = match tokio::time::timeout(self.timeout, nli.infer(claim, snippet)).await {
            Ok(Ok(raw)) => raw,
            Ok(Err(e)) => {
                let err = CheckError::InferenceUnavailable(e.to_string());
                tracing::warn!(error = %err, "NLI call failed, treating snippet as unsure");
                return EvidenceLabel::Unsure;
            }
            Err(_) => {
                let err = CheckError::Timeout { budget_ms: self.timeout.as_millis() as u64 };
                tracing::warn!(error = %err, "NLI call timed out, treating snippet as unsure");
                return EvidenceLabel::Unsure;
            }
        };

        match NliScores::from_raw(&raw) {
            Some(scores) => self.label_for(&scores),
            None => {
                let err = CheckError::InferenceUnavailable(format!("no recognised labels in {raw:?}"));
                tracing::warn!(error = %err, "malformed NLI output, treating snippet as unsure");
                EvidenceLabel::Unsure
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingNli {
        calls: AtomicUsize,
        out: Vec<RawLabelScore>,
    }

    impl CountingNli {
        fn new(out: Vec<RawLabelScore>) -> Arc<Self> {
            Arc::new(Self { calls: AtomicUsize::new(0), out })
        }
    }

    #[async_trait::async_trait]
    impl NliBackend for CountingNli {
        async fn infer(&self, _c: &str, _e: &str) -> anyhow::Result<Vec<RawLabelScore>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.out.clone())
        }
    }

    struct FailingNli;
    #[async_trait::async_trait]
    impl NliBackend for FailingNli {
        async fn infer(&self, _c: &str, _e: &str) -> anyhow::Result<Vec<RawLabelScore>> {
            anyhow::bail!("model unavailable")
        }
    }

    struct SlowNli;
    #[async_trait::async_trait]
    impl NliBackend for SlowNli {
        async fn infer(&self, _c: &str, _e: &str) -> anyhow::Result<Vec<RawLabelScore>> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(vec![RawLabelScore::new("ENTAILMENT", 0.99)])
        }
    }

    fn classifier(nli: Arc<dyn NliBackend>) -> EvidenceClassifier {
        EvidenceClassifier::new(Some(nli), Duration::from_secs(1))
    }

    #[test]
    fn label_table_maps_known_spellings() {
        assert_eq!(NliLabel::from_raw("LABEL_0"), Some(NliLabel::Entailment));
        assert_eq!(NliLabel::from_raw("LABEL_1"), Some(NliLabel::Neutral));
        assert_eq!(NliLabel::from_raw("LABEL_2"), Some(NliLabel::Contradiction));
        assert_eq!(NliLabel::from_raw("entailment"), Some(NliLabel::Entailment));
        assert_eq!(NliLabel::from_raw("Contradiction"), Some(NliLabel::Contradiction));
        assert_eq!(NliLabel::from_raw("LABEL_3"), None);
        assert_eq!(NliLabel::from_raw("positive"), None);
    }

    #[test]
    fn scores_skip_unknown_labels() {
        let raw = vec![RawLabelScore::new("LABEL_2", 0.7), RawLabelScore::new("weird", 0.3)];
        let s = NliScores::from_raw(&raw).unwrap();
        assert_eq!(s.contradiction, 0.7);
        assert_eq!(s.entailment, 0.0);
        assert!(NliScores::from_raw(&[RawLabelScore::new("weird", 1.0)]).is_none());
        assert!(NliScores::from_raw(&[]).is_none());
    }

    #[test]
    fn thresholds_are_strict() {
        let c = EvidenceClassifier::new(None, Duration::from_secs(1));
        let at = |e, n, x| c.label_for(&NliScores { entailment: e, neutral: n, contradiction: x });
        assert_eq!(at(0.51, 0.2, 0.29), EvidenceLabel::Agrees);
        assert_eq!(at(0.5, 0.0, 0.5), EvidenceLabel::Unsure);
        assert_eq!(at(0.1, 0.2, 0.7), EvidenceLabel::Disagrees);
        assert_eq!(at(0.3, 0.4, 0.3), EvidenceLabel::Unsure);
    }

    #[tokio::test]
    async fn blank_snippet_skips_backend() {
        let nli = CountingNli::new(vec![RawLabelScore::new("ENTAILMENT", 0.99)]);
        let c = classifier(nli.clone());
        assert_eq!(c.classify("claim", "").await, EvidenceLabel::Unsure);
        assert_eq!(c.classify("claim", "   ").await, EvidenceLabel::Unsure);
        assert_eq!(nli.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn maps_backend_output_to_label() {
        let nli = CountingNli::new(vec![
            RawLabelScore::new("LABEL_0", 0.05),
            RawLabelScore::new("LABEL_1", 0.15),
            RawLabelScore::new("LABEL_2", 0.80),
        ]);
        let c = classifier(nli.clone());
        assert_eq!(c.classify("claim", "snippet").await, EvidenceLabel::Disagrees);
        assert_eq!(nli.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn backend_failure_is_unsure() {
        assert_eq!(classifier(Arc::new(FailingNli)).classify("c", "s").await, EvidenceLabel::Unsure);
    }

    #[tokio::test]
    async fn malformed_output_is_unsure() {
        let nli = CountingNli::new(vec![RawLabelScore::new("POSITIVE", 0.99)]);
        assert_eq!(classifier(nli).classify("c", "s").await, EvidenceLabel::Unsure);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_backend_times_out_to_unsure() {
        assert_eq!(classifier(Arc::new(SlowNli)).classify("c", "s").await, EvidenceLabel::Unsure);
    }

    #[tokio::test]
    async fn no_backend_is_unsure() {
        let c = EvidenceClassifier::new(None, Duration::from_secs(1));
        assert_eq!(c.classify("c", "a real snippet").await, EvidenceLabel::Unsure);
    }
}
