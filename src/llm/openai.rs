use anyhow::{anyhow, Result};
use async_openai::{config::OpenAIConfig, Client, types::{ChatCompletionRequestMessage, CreateChatCompletionRequestArgs}};

use super::Llm;

/// OpenAI-compatible chat client; `base_url` points it at any compatible server.
#[derive(Clone)]
pub struct LlmClient {
    client: Client<OpenAIConfig>,
    model: String,
}

impl LlmClient {
    pub fn new(model: String, base_url: Option<String>, api_key: Option<String>) -> Self {
        let mut cfg = OpenAIConfig::default();
        if let Some(url) = base_url { cfg = cfg.with_api_base(url); }
        if let Some(key) = api_key { cfg = cfg.with_api_key(key); }
        let client = Client::with_config(cfg);
        Self { client, model }
    }
}

#[async_trait::async_trait]
impl Llm for LlmClient {
    async fn chat(&self, messages: Vec<ChatCompletionRequestMessage>) -> Result<String> {
        let req = CreateChatCompletionRequestArgs::default()
            .model(self.model.clone())
            .messages(messages)
            .temperature(0.0)
            .build()?;
        let resp = self.client.chat().create(req).await?;
        let choice = resp.choices.into_iter().next().ok_or_else(|| anyhow!("chat completion returned no choices"))?;
        Ok(choice.message.content.unwrap_or_default())
    }
}
