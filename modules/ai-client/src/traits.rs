use anyhow::Result;
use async_trait::async_trait;

// =============================================================================
// TextModel Trait
// =============================================================================

/// A generative model that turns one prompt into one text response.
///
/// Single synchronous request, no streaming, no conversation state. Every
/// provider in this crate implements it so callers can hold an
/// `Arc<dyn TextModel>` and swap providers from configuration.
#[async_trait]
pub trait TextModel: Send + Sync {
    /// Model identifier as sent on the wire (e.g. `gemini-2.5-flash`).
    fn model(&self) -> &str;

    /// Send `prompt` as a single user turn and return the text reply.
    async fn complete(&self, prompt: &str) -> Result<String>;
}
