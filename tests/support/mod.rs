#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use claimcheck_rs::classifier::Classifier;
use claimcheck_rs::nli::{NliBackend, RawLabelScore};
use claimcheck_rs::serper::Searcher;
use claimcheck_rs::{CheckConfig, Checker, SearchHit};

pub struct FakeSearcher {
    pub results: Vec<SearchHit>,
}

#[async_trait]
impl Searcher for FakeSearcher {
    async fn search(&self, _query: &str, limit: usize) -> Result<Vec<SearchHit>> {
        Ok(self.results.iter().take(limit).cloned().collect())
    }
}

pub struct FailingSearcher;

#[async_trait]
impl Searcher for FailingSearcher {
    async fn search(&self, _query: &str, _limit: usize) -> Result<Vec<SearchHit>> {
        anyhow::bail!("transport error")
    }
}

/// NLI double keyed on snippet text: "ENTAILS" → entailment,
/// "CONTRADICTS" → contradiction, "FAIL" → error, anything else → neutral.
#[derive(Default)]
pub struct ScriptedNli {
    pub calls: AtomicUsize,
}

impl ScriptedNli {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NliBackend for ScriptedNli {
    async fn infer(&self, _claim: &str, evidence: &str) -> Result<Vec<RawLabelScore>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let (ent, neu, con) = if evidence.contains("ENTAILS") {
            (0.92, 0.05, 0.03)
        } else if evidence.contains("CONTRADICTS") {
            (0.02, 0.08, 0.90)
        } else if evidence.contains("FAIL") {
            anyhow::bail!("inference server unavailable")
        } else {
            (0.2, 0.6, 0.2)
        };
        Ok(vec![
            RawLabelScore::new("LABEL_0", ent),
            RawLabelScore::new("LABEL_1", neu),
            RawLabelScore::new("LABEL_2", con),
        ])
    }
}

pub struct FixedClassifier(pub f64);

#[async_trait]
impl Classifier for FixedClassifier {
    async fn predict_probability_real(&self, _text: &str) -> Result<f64> {
        Ok(self.0)
    }
}

pub fn hit(title: &str, link: &str, snippet: &str) -> SearchHit {
    SearchHit::new(title, link, snippet)
}

pub fn checker(results: Vec<SearchHit>, nli: Arc<ScriptedNli>, model_score: Option<f64>) -> Checker {
    let classifier = model_score.map(|p| Arc::new(FixedClassifier(p)) as Arc<dyn Classifier>);
    Checker::new(
        CheckConfig::default(),
        Arc::new(FakeSearcher { results }),
        Some(nli as Arc<dyn NliBackend>),
        classifier,
    )
    .unwrap()
}
