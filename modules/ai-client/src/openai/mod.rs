pub(crate) mod types;

use crate::traits::TextModel;
use crate::transport::{auth_headers, post_json};
use anyhow::{anyhow, Result};
use async_trait::async_trait;

use types::{uses_max_completion_tokens, ChatRequest, ChatResponse, WireMessage};

const OPENAI_API_URL: &str = "https://api.openai.com/v1";

/// OpenAI Chat Completions API (or any compatible endpoint via `with_base_url`).
#[derive(Clone)]
pub struct OpenAi {
    api_key: String,
    pub(crate) model: String,
    base_url: String,
}

impl OpenAi {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: OPENAI_API_URL.to_string(),
        }
    }

    pub fn from_env(model: impl Into<String>) -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| anyhow!("OPENAI_API_KEY environment variable not set"))?;
        Ok(Self::new(api_key, model))
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub async fn chat_completion(
        &self,
        system: impl Into<String>,
        user: impl Into<String>,
    ) -> Result<String> {
        let mut request = ChatRequest::new(&self.model)
            .message(WireMessage::system(system))
            .message(WireMessage::user(user));

        // Reasoning models reject temperature and the legacy token field.
        if uses_max_completion_tokens(&self.model) {
            request = request.max_completion_tokens(8192);
        } else {
            request = request.max_tokens(8192).temperature(0.0);
        }

        let bearer = format!("Bearer {}", self.api_key);
        let headers = auth_headers(&[("authorization", &bearer)])?;
        let url = format!("{}/chat/completions", self.base_url);
        let response: ChatResponse = post_json("OpenAI", &url, headers, &request).await?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| anyhow!("No response from OpenAI"))
    }
}

#[async_trait]
impl TextModel for OpenAi {
    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        self.chat_completion("You are a careful data analyst. Reply with JSON only.", prompt)
            .await
    }
}
