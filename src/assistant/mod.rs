// Knowledge assistant module
// The retrieval-augmented answer flow: embed the question, pull the
// nearest chunks out of the vector index, wrap them in a grounded prompt,
// and stream the reply from the chat service.


use itertools::Itertools;
use tracing::{debug, info};

use crate::chat::{ChatClient, ChatMessage, ChatRole};
use crate::config::Config;
use crate::embeddings::encoder::{Embedder, LocalEncoder};
use crate::index::{SearchResult, VectorIndex};
use crate::{GridError, Result};

/// Opening message shown when the assistant widget starts
pub const GREETING: &str = "Hello! I am the platform assistant. Ask me anything about DC short-circuit faults or system voltage.";

/// Rendered instead of an answer when no credential is configured
pub const MISSING_KEY_NOTICE: &str = "⚠️ No DEEPSEEK_API_KEY detected. Export the variable or store the key with `gridwatch config`, then ask again.";

/// Build the grounded instruction prompt around retrieved context.
///
/// The wording is part of the contract: the model must answer only from
/// the supplied material and must decline rather than fabricate.
#[inline]
pub fn build_grounded_prompt(context: &str, question: &str) -> String {
    format!(
        r#"You are an electrical engineering expert for a deep-sea offshore wind power platform.
Answer the [User question] strictly according to the [Reference material] below.
If the reference material contains no relevant answer, reply "not found in knowledge base" directly instead of fabricating one.

[Reference material]:
{context}

[User question]:
{question}"#
    )
}

/// The assistant: a read-only index handle, the pinned query encoder, and
/// the chat client, loaded once per process.
pub struct Assistant<E: Embedder> {
    encoder: E,
    index: VectorIndex,
    client: ChatClient,
    top_k: usize,
}

impl Assistant<LocalEncoder> {
    /// Load the production assistant. Fails fast when the index is missing
    /// or was built with a different embedding model, and with
    /// [`GridError::MissingApiKey`] when no credential is configured.
    #[inline]
    pub async fn open(config: &Config) -> Result<Self> {
        let client = ChatClient::new(&config.chat)?;
        let encoder = LocalEncoder::new()?;
        let index = VectorIndex::open(
            &config.paths.index_dir,
            encoder.model_id(),
            encoder.dimension(),
        )
        .await?;

        info!(
            "Assistant ready ({} chunks indexed)",
            index.manifest().chunk_count
        );

        Ok(Self {
            encoder,
            index,
            client,
            top_k: config.retrieval.top_k,
        })
    }
}

impl<E: Embedder> Assistant<E> {
    #[inline]
    pub fn with_parts(encoder: E, index: VectorIndex, client: ChatClient, top_k: usize) -> Self {
        Self {
            encoder,
            index,
            client,
            top_k,
        }
    }

    /// Retrieve the top-K nearest chunks for a question and concatenate
    /// their text in ranking order. There is no distance cutoff: the
    /// nearest K chunks are always supplied, and the prompt instructs the
    /// model to decline when they are irrelevant.
    #[inline]
    pub async fn retrieve(&mut self, question: &str) -> Result<(String, Vec<SearchResult>)> {
        let query_vector = self.encoder.embed_query(question)?;
        let results = self.index.search(&query_vector, self.top_k).await?;

        debug!(
            "Retrieved {} chunks for question ({} requested)",
            results.len(),
            self.top_k
        );

        let context = results
            .iter()
            .map(|result| result.content.as_str())
            .join("\n\n");

        Ok((context, results))
    }

    /// Answer the conversation's final user message.
    ///
    /// The grounded prompt replaces the final message of an otherwise
    /// unmodified history before submission; earlier turns are sent as-is
    /// so the model keeps conversational context.
    #[inline]
    pub async fn answer(
        &mut self,
        conversation: &[ChatMessage],
        on_delta: impl FnMut(&str),
    ) -> Result<String> {
        let question = conversation
            .last()
            .filter(|message| message.role == ChatRole::User)
            .ok_or_else(|| {
                GridError::Chat("Conversation must end with a user question".to_string())
            })?;

        let (context, _) = self.retrieve(&question.content).await?;
        let prompt = build_grounded_prompt(&context, &question.content);

        let mut api_messages = conversation[..conversation.len() - 1].to_vec();
        api_messages.push(ChatMessage::user(prompt));

        self.client.stream_chat(&api_messages, on_delta).await
    }
}
