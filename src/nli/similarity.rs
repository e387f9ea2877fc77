use anyhow::Result;
use unicode_segmentation::UnicodeSegmentation;

use super::{NliBackend, RawLabelScore};

/// Model-free fallback: treats a snippet that closely restates the claim as
/// entailment and anything else as neutral. It never reports contradiction.
pub struct SimilarityNli {
    cutoff: f64,
}

fn words(text: &str) -> Vec<String> {
    text.unicode_words().map(str::to_lowercase).collect()
}

fn lcs_len(a: &[String], b: &[String]) -> usize {
    let mut prev = vec![0usize; b.len() + 1];
    let mut cur = vec![0usize; b.len() + 1];
    for x in a {
        for (j, y) in b.iter().enumerate() {
            cur[j + 1] = if x == y { prev[j] + 1 } else { cur[j].max(prev[j + 1]) };
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    prev[b.len()]
}

/// `2 * LCS / (|a| + |b|)` over lowercase words, in [0, 1].
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let (wa, wb) = (words(a), words(b));
    let total = wa.len() + wb.len();
    if total == 0 {
        return 0.0;
    }
    2.0 * lcs_len(&wa, &wb) as f64 / total as f64
}

impl SimilarityNli {
    pub fn new(cutoff: f64) -> Self {
        Self { cutoff }
    }
}

#[async_trait::async_trait]
impl NliBackend for SimilarityNli {
    async fn infer(&self, claim: &str, evidence: &str) -> Result<Vec<RawLabelScore>> {
        let ratio = similarity_ratio(claim, evidence);
        tracing::debug!(ratio, cutoff = self.cutoff, "similarity fallback");
        let label = if ratio >= self.cutoff { "ENTAILMENT" } else { "NEUTRAL" };
        Ok(vec![RawLabelScore::new(label, 1.0)])
    }
}
