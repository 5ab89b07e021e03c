pub(crate) mod types;

use crate::traits::TextModel;
use crate::transport::{auth_headers, post_json};
use anyhow::{anyhow, Result};
use async_trait::async_trait;

use types::*;

const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Google Generative Language API (`generateContent`).
#[derive(Clone)]
pub struct Gemini {
    api_key: String,
    pub(crate) model: String,
    base_url: String,
}

impl Gemini {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: GEMINI_API_URL.to_string(),
        }
    }

    pub fn from_env(model: impl Into<String>) -> Result<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .map_err(|_| anyhow!("GEMINI_API_KEY environment variable not set"))?;
        Ok(Self::new(api_key, model))
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    /// Single-turn generation with deterministic sampling.
    pub async fn generate_content(&self, prompt: impl Into<String>) -> Result<String> {
        let request = GenerateRequest {
            contents: vec![Content::user(prompt)],
            generation_config: GenerationConfig {
                temperature: Some(0.0),
                max_output_tokens: Some(8192),
            },
        };

        let headers = auth_headers(&[("x-goog-api-key", &self.api_key)])?;
        let response: GenerateResponse =
            post_json("Gemini", &self.endpoint(), headers, &request).await?;

        response
            .text()
            .ok_or_else(|| anyhow!("No response from Gemini"))
    }
}

#[async_trait]
impl TextModel for Gemini {
    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        self.generate_content(prompt).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gemini_new() {
        let ai = Gemini::new("gm-test", "gemini-2.5-flash");
        assert_eq!(ai.model(), "gemini-2.5-flash");
        assert_eq!(ai.api_key(), "gm-test");
    }

    #[test]
    fn endpoint_names_model() {
        let ai = Gemini::new("gm-test", "gemini-2.5-flash").with_base_url("http://localhost:9000/");
        assert_eq!(
            ai.endpoint(),
            "http://localhost:9000/models/gemini-2.5-flash:generateContent"
        );
    }
}
