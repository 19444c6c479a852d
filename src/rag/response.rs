//! Answer generation with the OpenAI completion APIs.

use super::context::{format_context, select_context};
use super::{Answer, AnswerRequest, Answerer, Model};
use crate::config::Prompts;
use crate::corpus::EmbeddingGroup;
use crate::embedding::Embedder;
use crate::error::{Result, TutorError};
use crate::openai::create_client;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    CreateCompletionRequestArgs,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Answers questions by retrieving course sections and calling OpenAI.
pub struct OpenAIAnswerer {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    embedder: Arc<dyn Embedder>,
    prompts: Prompts,
    chronological: bool,
}

impl OpenAIAnswerer {
    pub fn new(embedder: Arc<dyn Embedder>) -> Result<Self> {
        Ok(Self {
            client: create_client()?,
            embedder,
            prompts: Prompts::default(),
            chronological: true,
        })
    }

    /// Set custom prompts (with user-defined variables).
    pub fn with_prompts(mut self, prompts: Prompts) -> Self {
        self.prompts = prompts;
        self
    }

    /// Keep selected sections in ranking order instead of document order.
    pub fn with_chronological(mut self, chronological: bool) -> Self {
        self.chronological = chronological;
        self
    }

    /// Select context for a question and render the prompt pair.
    ///
    /// Returns the system prompt, the user prompt and the titles used.
    pub async fn build_prompt(
        &self,
        embeddings: &EmbeddingGroup,
        request: &AnswerRequest,
    ) -> Result<(String, String, Vec<String>)> {
        let sections = if embeddings.is_empty() {
            Vec::new()
        } else {
            let query = self.embedder.embed(&request.question).await?;
            select_context(embeddings, &query, request.max_context_len, self.chronological)
        };

        if sections.is_empty() {
            warn!("No course sections fit in the context window");
        }
        debug!("Selected {} of {} sections", sections.len(), embeddings.len());

        let mut vars = HashMap::new();
        vars.insert("question".to_string(), request.question.clone());
        vars.insert(
            "context".to_string(),
            format_context(&sections, request.prompt_template),
        );

        let (system, user) = self.prompts.answer.for_template(request.prompt_template);
        let system = self.prompts.render_with_custom(system, &vars);
        let user = self.prompts.render_with_custom(user, &vars);
        let titles = sections.iter().map(|e| e.title.clone()).collect();

        Ok((system, user, titles))
    }

    async fn complete_chat(&self, system: String, user: String, request: &AnswerRequest) -> Result<String> {
        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(system)
                .build()
                .map_err(|e| TutorError::Rag(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(user)
                .build()
                .map_err(|e| TutorError::Rag(e.to_string()))?
                .into(),
        ];

        let chat_request = CreateChatCompletionRequestArgs::default()
            .model(request.model.as_str())
            .messages(messages)
            .temperature(request.temperature)
            .max_tokens(request.max_output_tokens)
            .build()
            .map_err(|e| TutorError::Rag(e.to_string()))?;

        let response = self.client.chat().create(chat_request).await.map_err(|e| {
            TutorError::OpenAI(format!("Failed to generate response: {}", e))
        })?;

        completion_text(
            response
                .choices
                .first()
                .and_then(|c| c.message.content.as_deref()),
        )
    }

    async fn complete_text(&self, system: String, user: String, request: &AnswerRequest) -> Result<String> {
        let completion_request = CreateCompletionRequestArgs::default()
            .model(request.model.as_str())
            .prompt(format!("{}\n\n{}", system, user))
            .temperature(request.temperature)
            .max_tokens(request.max_output_tokens)
            .build()
            .map_err(|e| TutorError::Rag(e.to_string()))?;

        let response = self
            .client
            .completions()
            .create(completion_request)
            .await
            .map_err(|e| TutorError::OpenAI(format!("Failed to generate response: {}", e)))?;

        completion_text(response.choices.first().map(|c| c.text.as_str()))
    }
}

/// Trimmed text of the first completion choice. Missing or blank text is an error.
fn completion_text(content: Option<&str>) -> Result<String> {
    content
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .ok_or_else(|| TutorError::Rag("Empty response from LLM".to_string()))
}

#[async_trait]
impl Answerer for OpenAIAnswerer {
    #[instrument(skip(self, embeddings, request), fields(model = %request.model, sections = embeddings.len()))]
    async fn answer_question(
        &self,
        embeddings: &EmbeddingGroup,
        request: &AnswerRequest,
    ) -> Result<Answer> {
        request.validate()?;
        info!("Answering question: {}", request.question);

        let (system, user, sources) = self.build_prompt(embeddings, request).await?;

        let text = match request.model {
            Model::Gpt4 | Model::Gpt35Turbo => self.complete_chat(system, user, request).await?,
            Model::TextDavinci003 => self.complete_text(system, user, request).await?,
        };

        debug!("Generated answer from {} sources", sources.len());
        Ok(Answer { text, sources })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::Embedding;
    use crate::rag::PromptTemplate;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Embeds every text as the same unit vector and counts calls.
    struct FixedEmbedder {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Embedder for FixedEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![1.0, 0.0])
        }

        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            Ok(texts.iter().map(|_| vec![1.0, 0.0]).collect())
        }

        fn model(&self) -> &str {
            "fixed"
        }
    }

    fn answerer() -> (OpenAIAnswerer, Arc<FixedEmbedder>) {
        let embedder = Arc::new(FixedEmbedder {
            calls: AtomicUsize::new(0),
        });
        let answerer = OpenAIAnswerer::new(embedder.clone()).unwrap();
        (answerer, embedder)
    }

    fn group() -> EmbeddingGroup {
        EmbeddingGroup::new(vec![
            Embedding::new("1.1 Intro", "Rays are lines.", vec![0.0, 1.0]),
            Embedding::new("2.1 CNNs", "Convolutions slide kernels.", vec![1.0, 0.0]),
        ])
    }

    #[tokio::test]
    async fn test_build_prompt_sources() {
        let (answerer, _) = answerer();
        let mut request = AnswerRequest::new("What is a convolution?");
        request.prompt_template = PromptTemplate::Sources;

        let (system, user, titles) = answerer.build_prompt(&group(), &request).await.unwrap();

        assert!(!system.is_empty());
        assert!(user.contains("What is a convolution?"));
        assert!(user.contains("[1] 1.1 Intro"));
        assert!(user.contains("[2] 2.1 CNNs"));
        assert_eq!(titles, vec!["1.1 Intro", "2.1 CNNs"]);
    }

    #[tokio::test]
    async fn test_build_prompt_ranking_order() {
        let (answerer, _) = answerer();
        let answerer = answerer.with_chronological(false);
        let request = AnswerRequest::new("What is a convolution?");

        let (_, user, titles) = answerer.build_prompt(&group(), &request).await.unwrap();

        assert_eq!(titles, vec!["2.1 CNNs", "1.1 Intro"]);
        assert!(user.contains("Convolutions slide kernels.\n\n###\n\nRays are lines."));
    }

    #[tokio::test]
    async fn test_empty_group_skips_embedding() {
        let (answerer, embedder) = answerer();
        let request = AnswerRequest::new("Anything?");

        let (_, user, titles) = answerer
            .build_prompt(&EmbeddingGroup::default(), &request)
            .await
            .unwrap();

        assert!(titles.is_empty());
        assert!(user.contains("Anything?"));
        assert_eq!(embedder.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_completion_text() {
        assert_eq!(completion_text(Some("  A ray is a line.\n")).unwrap(), "A ray is a line.");
        assert!(matches!(completion_text(Some("")), Err(TutorError::Rag(_))));
        assert!(matches!(completion_text(Some(" \n ")), Err(TutorError::Rag(_))));
        assert!(matches!(completion_text(None), Err(TutorError::Rag(_))));
    }

    #[tokio::test]
    async fn test_invalid_request_fails_before_api_call() {
        let (answerer, embedder) = answerer();
        let mut request = AnswerRequest::new("Too hot?");
        request.temperature = 3.0;

        let err = answerer.answer_question(&group(), &request).await.unwrap_err();

        assert!(matches!(err, TutorError::InvalidInput(_)));
        assert_eq!(embedder.calls.load(Ordering::SeqCst), 0);
    }
}
