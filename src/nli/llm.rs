use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_openai::types::{ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs};
use serde::Deserialize;

use super::{NliBackend, RawLabelScore};
use crate::llm::Llm;

/// NLI judgments from a chat model asked for a probability per relation.
pub struct LlmNli {
    llm: Arc<dyn Llm>,
}

#[derive(Debug, Deserialize)]
struct RelationProbs {
    entailment: f64,
    neutral: f64,
    contradiction: f64,
}

fn build_nli_prompt(claim: &str, evidence: &str) -> Result<Vec<ChatCompletionRequestMessage>> {
    let sys: ChatCompletionRequestMessage = ChatCompletionRequestSystemMessageArgs::default()
        .content("You are a natural language inference model. Judge whether the evidence (premise) entails, contradicts, or is neutral toward the claim (hypothesis). Use only the evidence text.")
        .build()?
        .into();
    let usr: ChatCompletionRequestMessage = ChatCompletionRequestUserMessageArgs::default()
        .content(format!(
            "Claim:\n{claim}\n\nEvidence:\n{evidence}\n\nReturn JSON only: {{\"entailment\": p, \"neutral\": p, \"contradiction\": p}} with probabilities summing to 1."
        ))
        .build()?
        .into();
    Ok(vec![sys, usr])
}

/// Pulls the outermost JSON object out of a reply that may carry prose or code fences.
fn parse_relation_probs(reply: &str) -> Result<RelationProbs> {
    let start = reply.find('{').ok_or_else(|| anyhow!("no JSON object in reply"))?;
    let end = reply.rfind('}').ok_or_else(|| anyhow!("unterminated JSON object in reply"))?;
    if end < start {
        return Err(anyhow!("malformed JSON object in reply"));
    }
    Ok(serde_json::from_str(&reply[start..=end])?)
}

impl LlmNli {
    pub fn new(llm: Arc<dyn Llm>) -> Self {
        Self { llm }
    }
}

#[async_trait::async_trait]
impl NliBackend for LlmNli {
    async fn infer(&self, claim: &str, evidence: &str) -> Result<Vec<RawLabelScore>> {
        let reply = self.llm.chat(build_nli_prompt(claim, evidence)?).await?;
        let probs = parse_relation_probs(&reply)?;
        Ok(vec![
            RawLabelScore::new("ENTAILMENT", probs.entailment),
            RawLabelScore::new("NEUTRAL", probs.neutral),
            RawLabelScore::new("CONTRADICTION", probs.contradiction),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeLlm(&'static str);
    #[async_trait::async_trait]
    impl Llm for FakeLlm {
        async fn chat(&self, messages: Vec<ChatCompletionRequestMessage>) -> Result<String> {
            assert_eq!(messages.len(), 2);
            Ok(self.0.to_string())
        }
    }

    #[tokio::test]
    async fn reads_fenced_json_reply() {
        let nli = LlmNli::new(Arc::new(FakeLlm("```json\n{\"entailment\": 0.8, \"neutral\": 0.15, \"contradiction\": 0.05}\n```")));
        let scores = nli.infer("c", "e").await.unwrap();
        assert_eq!(scores[0], RawLabelScore::new("ENTAILMENT", 0.8));
        assert_eq!(scores[2], RawLabelScore::new("CONTRADICTION", 0.05));
    }

    #[tokio::test]
    async fn prose_reply_is_error() {
        let nli = LlmNli::new(Arc::new(FakeLlm("I cannot tell.")));
        assert!(nli.infer("c", "e").await.is_err());
    }
}
