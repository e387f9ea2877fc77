use std::time::Duration;

use anyhow::{bail, Result};
use reqwest::Client;
use serde::Deserialize;

use super::{NliBackend, RawLabelScore};

/// Hosted text-classification endpoint running an MNLI model
/// (Hugging Face inference API or a compatible server).
pub struct HttpNli {
    http: Client,
    url: String,
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InferenceResp {
    Nested(Vec<Vec<RawLabelScore>>),
    Flat(Vec<RawLabelScore>),
}

impl InferenceResp {
    fn into_scores(self) -> Vec<RawLabelScore> {
        match self {
            InferenceResp::Nested(outer) => outer.into_iter().next().unwrap_or_default(),
            InferenceResp::Flat(scores) => scores,
        }
    }
}

/// Premise/hypothesis pair in the single-string form MNLI pipelines expect.
fn pair_input(claim: &str, evidence: &str) -> String {
    format!("{claim} </s> {evidence}")
}

impl HttpNli {
    pub fn new(url: String, token: Option<String>, timeout_ms: u64) -> Result<Self> {
        let http = Client::builder().timeout(Duration::from_millis(timeout_ms)).build()?;
        Ok(Self { http, url, token })
    }
}

#[async_trait::async_trait]
impl NliBackend for HttpNli {
    async fn infer(&self, claim: &str, evidence: &str) -> Result<Vec<RawLabelScore>> {
        let mut req = self.http
            .post(&self.url)
            .json(&serde_json::json!({ "inputs": pair_input(claim, evidence), "parameters": { "top_k": 3 } }));
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        let scores = req.send().await?
            .error_for_status()?
            .json::<InferenceResp>().await?
            .into_scores();
        if scores.is_empty() {
            bail!("inference endpoint returned no scores");
        }
        Ok(scores)
    }
}
