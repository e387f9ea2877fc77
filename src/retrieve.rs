use std::sync::Arc;
use std::time::Duration;

use futures::{stream, StreamExt};

use crate::config::{CheckConfig, UnsurePolicy};
use crate::error::CheckError;
use crate::serper::Searcher;
use crate::trust::TrustFilter;
use crate::types::*;
use crate::verification::EvidenceClassifier;

/// Runs one search for a claim and sorts the hits into an [`EvidenceSet`].
///
/// Other-domain hits go to `others` unexamined. Trusted hits are checked by
/// the [`EvidenceClassifier`]. Those it cannot resolve also land in `others`
/// under the default [`UnsurePolicy`], so every returned hit stays visible.
pub struct SearchEvidenceCollector {
    searcher: Arc<dyn Searcher>,
    trust: TrustFilter,
    classifier: EvidenceClassifier,
    timeout: Duration,
    concurrency: usize,
    unsure_policy: UnsurePolicy,
}

impl SearchEvidenceCollector {
    pub fn new(searcher: Arc<dyn Searcher>, trust: TrustFilter, classifier: EvidenceClassifier, cfg: &CheckConfig) -> Self {
        Self {
            searcher,
            trust,
            classifier,
            timeout: cfg.collaborator_timeout(),
            concurrency: cfg.nli_concurrency.max(1),
            unsure_policy: cfg.unsure_policy,
        }
    }

    /// Never fails: a search error, timeout or empty response yields an empty set.
    pub async fn collect(&self, claim: &str, max_results: usize) -> EvidenceSet {
        let hits = match tokio::time::timeout(self.timeout, self.searcher.search(claim, max_results)).await {
            Ok(Ok(hits)) => hits,
            Ok(Err(e)) => {
                let err = CheckError::EvidenceUnavailable(e.to_string());
                tracing::warn!(error = %err, "search failed, continuing without evidence");
                return EvidenceSet::default();
            }
            Err(_) => {
                let err = CheckError::Timeout { budget_ms: self.timeout.as_millis() as u64 };
                tracing::warn!(error = %err, "search timed out, continuing without evidence");
                return EvidenceSet::default();
            }
        };

        if hits.len() > max_results {
            tracing::debug!(discarded = hits.len() - max_results, max_results, "search returned more hits than requested");
        }
        let tasks = hits.into_iter().take(max_results).map(|hit| async move {
            let label = match self.trust.classify(&hit.link) {
                TrustLabel::Trusted => {
                    let label = self.classifier.classify(claim, &hit.snippet).await;
                    tracing::debug!(link = %hit.link, ?label, "trusted hit classified");
                    Some(label)
                }
                TrustLabel::Other => None,
            };
            (hit, label)
        });
        let labelled = stream::iter(tasks).buffered(self.concurrency).collect::<Vec<_>>().await;

        let set = partition(labelled, self.unsure_policy);
        tracing::debug!(
            agrees = set.agrees.len(),
            disagrees = set.disagrees.len(),
            others = set.others.len(),
            "evidence collected"
        );
        set
    }
}

/// Splits labelled hits in order. `None` marks an other-domain hit.
pub fn partition(labelled: Vec<(SearchHit, Option<EvidenceLabel>)>, policy: UnsurePolicy) -> EvidenceSet {
    let mut set = EvidenceSet::default();
    for (hit, label) in labelled {
        match label {
            None => set.others.push(hit),
            Some(label @ EvidenceLabel::Agrees) => set.agrees.push(EvidenceItem { hit, label }),
            Some(label @ EvidenceLabel::Disagrees) => set.disagrees.push(EvidenceItem { hit, label }),
            Some(EvidenceLabel::Unsure) => match policy {
                UnsurePolicy::RetainInOthers => set.others.push(hit),
                UnsurePolicy::Drop => tracing::debug!(link = %hit.link, "dropping unresolved trusted hit"),
            },
        }
    }
    set
}
