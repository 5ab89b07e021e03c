// Test double for the model boundary. Search and fetch doubles live in
// `threadscope_archive::testing`.

use std::sync::Mutex;

use ai_client::TextModel;
use anyhow::{bail, Result};
use async_trait::async_trait;

/// Replies with a fixed text (or a fixed error) and records every prompt.
pub struct MockModel {
    reply: std::result::Result<String, String>,
    prompts: Mutex<Vec<String>>,
}

impl MockModel {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Ok(reply.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            reply: Err(message.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextModel for MockModel {
    fn model(&self) -> &str {
        "mock-model"
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(message) => bail!("MockModel: {message}"),
        }
    }
}
