use std::sync::Arc;

use ai_client::TextModel;
use threadscope_archive::Corpus;
use tracing::{info, warn};

use crate::error::{ExtractionError, Result};
use crate::parser::{parse_response, ExtractionResult};
use crate::prompter::build_prompt;
use crate::schema::ExtractionSchema;

/// Runs the one model call of an analysis and decodes the reply.
pub struct Extractor {
    model: Arc<dyn TextModel>,
}

impl Extractor {
    pub fn new(model: Arc<dyn TextModel>) -> Self {
        Self { model }
    }

    pub fn model_name(&self) -> &str {
        self.model.model()
    }

    pub async fn extract(
        &self,
        corpus: &Corpus,
        schema: &ExtractionSchema,
    ) -> Result<ExtractionResult> {
        let prompt = build_prompt(schema, &corpus.text);
        info!(
            model = self.model.model(),
            sources = corpus.len(),
            prompt_bytes = prompt.len(),
            "Sending corpus to model"
        );

        let reply = self
            .model
            .complete(&prompt)
            .await
            .map_err(|e| ExtractionError::Model(format!("{e:#}")))?;

        let result = parse_response(&reply, schema).inspect_err(|e| {
            warn!(error = %e, reply_bytes = reply.len(), "Model reply rejected");
        })?;

        info!(
            entries = result.entries.len(),
            summary_fields = result.summary_fields.len(),
            "Extraction complete"
        );
        Ok(result)
    }
}
