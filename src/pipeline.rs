use std::sync::Arc;

use crate::classifier::{Classifier, ModelScorer};
use crate::config::CheckConfig;
use crate::error::{CheckError, CheckResult};
use crate::nli::NliBackend;
use crate::retrieve::SearchEvidenceCollector;
use crate::serper::Searcher;
use crate::trust::TrustFilter;
use crate::types::{CheckReport, Claim, EvidenceSet};
use crate::verdict::VerdictEngine;
use crate::verification::EvidenceClassifier;

/// End-to-end claim check: model score and evidence in parallel, then the verdict.
///
/// Built once at startup and shared read-only between requests.
pub struct Checker {
    cfg: CheckConfig,
    scorer: ModelScorer,
    collector: SearchEvidenceCollector,
    engine: VerdictEngine,
}

impl Checker {
    pub fn new(
        cfg: CheckConfig,
        searcher: Arc<dyn Searcher>,
        nli: Option<Arc<dyn NliBackend>>,
        classifier: Option<Arc<dyn Classifier>>,
    ) -> CheckResult<Self> {
        cfg.validate()?;
        let trust = TrustFilter::new(cfg.allowlist.iter().cloned());
        let evidence = EvidenceClassifier::from_config(nli, &cfg);
        let collector = SearchEvidenceCollector::new(searcher, trust, evidence, &cfg);
        let scorer = ModelScorer::new(classifier, cfg.collaborator_timeout());
        let engine = VerdictEngine::from_config(&cfg);
        Ok(Self { cfg, scorer, collector, engine })
    }

    pub fn config(&self) -> &CheckConfig {
        &self.cfg
    }

    /// Fails only on an empty claim; every collaborator failure degrades the
    /// verdict instead.
    pub async fn check(&self, text: &str) -> CheckResult<CheckReport> {
        let claim = Claim::parse(text)?;

        let gather = async {
            tokio::join!(
                self.scorer.score(claim.as_str()),
                self.collector.collect(claim.as_str(), self.cfg.max_search_results),
            )
        };
        let (model_score, evidence) = match self.cfg.request_budget() {
            Some(budget) => match tokio::time::timeout(budget, gather).await {
                Ok(out) => out,
                Err(_) => {
                    let err = CheckError::Timeout { budget_ms: budget.as_millis() as u64 };
                    tracing::warn!(error = %err, "request budget exhausted before evidence was collected");
                    (None, EvidenceSet::default())
                }
            },
            None => gather.await,
        };

        let verdict = self.engine.decide(&evidence, model_score);
        tracing::info!(
            verdict = ?verdict.kind,
            agrees = evidence.agrees.len(),
            disagrees = evidence.disagrees.len(),
            others = evidence.others.len(),
            model_score,
            "claim checked"
        );
        Ok(CheckReport { claim, verdict, evidence, model_score })
    }
}
