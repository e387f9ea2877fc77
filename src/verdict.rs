//! The decision rule that turns evidence and an optional model score into a
//! verdict.
//!
//! Rules are evaluated in a fixed order and the first match wins:
//!
//! 1. at least `disagree_threshold` trusted contradictions → `FakeContradicted`
//! 2. at least `agree_threshold` trusted agreements → `RealConfirmed`
//! 3. model score `>= model_high_confidence` → `PossiblyReal`
//! 4. model score `<= model_low_confidence` → `PossiblyFake`
//! 5. otherwise → `Unsure`
//!
//! A contradiction outranks any number of agreements and any model score. A
//! single agreement never confirms a claim on its own.

use crate::config::CheckConfig;
use crate::types::{EvidenceSet, Verdict, VerdictKind};

#[derive(Debug, Clone, PartialEq)]
pub struct VerdictEngine {
    agree_threshold: usize,
    disagree_threshold: usize,
    model_high_confidence: f64,
    model_low_confidence: f64,
}

impl Default for VerdictEngine {
    fn default() -> Self {
        Self::from_config(&CheckConfig::default())
    }
}

fn sources(n: usize) -> &'static str {
    if n == 1 { "source" } else { "sources" }
}

impl VerdictEngine {
    pub fn from_config(cfg: &CheckConfig) -> Self {
        Self {
            agree_threshold: cfg.agree_threshold,
            disagree_threshold: cfg.disagree_threshold,
            model_high_confidence: cfg.model_high_confidence,
            model_low_confidence: cfg.model_low_confidence,
        }
    }

    pub fn decide(&self, evidence: &EvidenceSet, model_score: Option<f64>) -> Verdict {
        let disagrees = evidence.disagrees.len();
        if disagrees >= self.disagree_threshold {
            return Verdict {
                kind: VerdictKind::FakeContradicted,
                justification: format!("Contradicted by {disagrees} trusted {}.", sources(disagrees)),
            };
        }

        let agrees = evidence.agrees.len();
        if agrees >= self.agree_threshold {
            return Verdict {
                kind: VerdictKind::RealConfirmed,
                justification: format!("Confirmed by {agrees} trusted {}.", sources(agrees)),
            };
        }

        // NaN compares false on both sides and falls through to Unsure.
        match model_score {
            Some(p) if p >= self.model_high_confidence => Verdict {
                kind: VerdictKind::PossiblyReal,
                justification: format!("Model confidence: {:.1}% real.", p * 100.0),
            },
            Some(p) if p <= self.model_low_confidence => Verdict {
                kind: VerdictKind::PossiblyFake,
                justification: format!("Model confidence: {:.1}% real.", p * 100.0),
            },
            _ => Verdict {
                kind: VerdictKind::Unsure,
                justification: "Insufficient evidence from trusted sources.".to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EvidenceItem, EvidenceLabel, SearchHit};
    use proptest::prelude::*;

    fn item(i: usize, label: EvidenceLabel) -> EvidenceItem {
        EvidenceItem { hit: SearchHit::new(format!("t{i}"), format!("https://bbc.com/{i}"), "s"), label }
    }

    fn set(agrees: usize, disagrees: usize, others: usize) -> EvidenceSet {
        EvidenceSet {
            agrees: (0..agrees).map(|i| item(i, EvidenceLabel::Agrees)).collect(),
            disagrees: (0..disagrees).map(|i| item(i, EvidenceLabel::Disagrees)).collect(),
            others: (0..others).map(|i| SearchHit::new("o", format!("https://other.example/{i}"), "")).collect(),
        }
    }

    fn kind(agrees: usize, disagrees: usize, score: Option<f64>) -> VerdictKind {
        VerdictEngine::default().decide(&set(agrees, disagrees, 0), score).kind
    }

    #[test]
    fn contradiction_beats_everything() {
        let v = VerdictEngine::default().decide(&set(3, 1, 2), Some(0.99));
        assert_eq!(v.kind, VerdictKind::FakeContradicted);
        assert_eq!(v.justification, "Contradicted by 1 trusted source.");
    }

    #[test]
    fn two_agreements_confirm() {
        let v = VerdictEngine::default().decide(&set(2, 0, 0), None);
        assert_eq!(v.kind, VerdictKind::RealConfirmed);
        assert!(v.justification.contains('2'));
    }

    #[test]
    fn single_agreement_is_not_confirmation() {
        assert_eq!(kind(1, 0, None), VerdictKind::Unsure);
        assert_eq!(kind(1, 0, Some(0.5)), VerdictKind::Unsure);
        assert_eq!(kind(1, 0, Some(0.9)), VerdictKind::PossiblyReal);
    }

    #[test]
    fn no_evidence_no_model_is_unsure() {
        let v = VerdictEngine::default().decide(&EvidenceSet::default(), None);
        assert_eq!(v.kind, VerdictKind::Unsure);
        assert_eq!(v.justification, "Insufficient evidence from trusted sources.");
    }

    #[test]
    fn model_score_boundaries() {
        assert_eq!(kind(0, 0, Some(0.6)), VerdictKind::PossiblyReal);
        assert_eq!(kind(0, 0, Some(0.5999)), VerdictKind::Unsure);
        assert_eq!(kind(0, 0, Some(0.4)), VerdictKind::PossiblyFake);
        assert_eq!(kind(0, 0, Some(0.4001)), VerdictKind::Unsure);
        assert_eq!(kind(0, 0, Some(f64::NAN)), VerdictKind::Unsure);
    }

    #[test]
    fn model_justification_is_percentage() {
        let v = VerdictEngine::default().decide(&EvidenceSet::default(), Some(0.95));
        assert_eq!(v.justification, "Model confidence: 95.0% real.");
        let v = VerdictEngine::default().decide(&EvidenceSet::default(), Some(0.123));
        assert_eq!(v.kind, VerdictKind::PossiblyFake);
        assert_eq!(v.justification, "Model confidence: 12.3% real.");
    }

    #[test]
    fn thresholds_follow_config() {
        let cfg = CheckConfig { agree_threshold: 3, disagree_threshold: 2, ..CheckConfig::default() };
        let engine = VerdictEngine::from_config(&cfg);
        assert_eq!(engine.decide(&set(2, 1, 0), None).kind, VerdictKind::Unsure);
        assert_eq!(engine.decide(&set(3, 1, 0), None).kind, VerdictKind::RealConfirmed);
        assert_eq!(engine.decide(&set(3, 2, 0), None).kind, VerdictKind::FakeContradicted);
    }

    proptest! {
        #[test]
        fn any_disagreement_is_fake(agrees in 0usize..6, disagrees in 1usize..6, others in 0usize..6,
                                    score in proptest::option::of(0.0f64..=1.0)) {
            let v = VerdictEngine::default().decide(&set(agrees, disagrees, others), score);
            prop_assert_eq!(v.kind, VerdictKind::FakeContradicted);
        }

        #[test]
        fn one_agreement_never_confirms(others in 0usize..6, score in proptest::option::of(0.0f64..=1.0)) {
            let v = VerdictEngine::default().decide(&set(1, 0, others), score);
            prop_assert_ne!(v.kind, VerdictKind::RealConfirmed);
        }

        #[test]
        fn two_agreements_always_confirm(others in 0usize..6, score in proptest::option::of(0.0f64..=1.0)) {
            let v = VerdictEngine::default().decide(&set(2, 0, others), score);
            prop_assert_eq!(v.kind, VerdictKind::RealConfirmed);
        }
    }
}
