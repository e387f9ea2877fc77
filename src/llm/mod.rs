use anyhow::Result;
use async_openai::types::ChatCompletionRequestMessage;

pub mod openai;

/// Chat-completion collaborator.
#[async_trait::async_trait]
pub trait Llm: Send + Sync {
    /// Sends one conversation and returns the first choice's text.
    async fn chat(&self, messages: Vec<ChatCompletionRequestMessage>) -> Result<String>;
}
