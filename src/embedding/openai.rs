//! OpenAI embeddings implementation.

use super::Embedder;
use crate::config::EmbeddingSettings;
use crate::error::{Result, TutorError};
use crate::openai::create_client;
use async_openai::types::{CreateEmbeddingRequestArgs, EmbeddingInput};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// OpenAI has a limit on inputs per request.
const BATCH_SIZE: usize = 100;

/// OpenAI-based embedder.
pub struct OpenAIEmbedder {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    dimensions: Option<u32>,
}

impl OpenAIEmbedder {
    /// Create an embedder for a model, optionally requesting reduced dimensions.
    ///
    /// `dimensions` is only sent to the API when set; older models such as
    /// `text-embedding-ada-002` reject it.
    pub fn with_config(model: &str, dimensions: Option<u32>) -> Result<Self> {
        Ok(Self {
            client: create_client()?,
            model: model.to_string(),
            dimensions,
        })
    }

    pub fn from_settings(settings: &EmbeddingSettings) -> Result<Self> {
        Self::with_config(&settings.model, settings.dimensions)
    }
}

#[async_trait]
impl Embedder for OpenAIEmbedder {
    #[instrument(skip(self, text))]
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let embeddings = self.embed_batch(&[text.to_string()]).await?;
        embeddings
            .into_iter()
            .next()
            .ok_or_else(|| TutorError::Embedding("Empty embedding response".to_string()))
    }

    #[instrument(skip(self, texts), fields(count = texts.len()))]
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!("Generating embeddings for {} texts", texts.len());

        let mut all_embeddings = Vec::with_capacity(texts.len());

        for chunk in texts.chunks(BATCH_SIZE) {
            let mut args = CreateEmbeddingRequestArgs::default();
            args.model(&self.model)
                .input(EmbeddingInput::StringArray(chunk.to_vec()));
            if let Some(dimensions) = self.dimensions {
                args.dimensions(dimensions);
            }
            let request = args
                .build()
                .map_err(|e| TutorError::Embedding(format!("Failed to build request: {}", e)))?;

            let response = self
                .client
                .embeddings()
                .create(request)
                .await
                .map_err(|e| TutorError::OpenAI(format!("Embedding API error: {}", e)))?;

            // Sort by index to ensure correct order
            let mut embeddings: Vec<_> = response.data.into_iter().collect();
            embeddings.sort_by_key(|e| e.index);

            all_embeddings.extend(embeddings.into_iter().map(|e| e.embedding));
        }

        debug!("Generated {} embeddings", all_embeddings.len());
        Ok(all_embeddings)
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedder_creation() {
        let embedder = OpenAIEmbedder::with_config("text-embedding-ada-002", None).unwrap();
        assert_eq!(embedder.model(), "text-embedding-ada-002");
        assert_eq!(embedder.dimensions, None);

        let settings = EmbeddingSettings {
            model: "text-embedding-3-small".to_string(),
            dimensions: Some(512),
        };
        let embedder = OpenAIEmbedder::from_settings(&settings).unwrap();
        assert_eq!(embedder.dimensions, Some(512));
    }
}
