//! Responder adapter for any OpenAI-compatible chat-completions API.

use crate::agent_port::{AgentFailure, AgentPort, FailureCause};
use crate::prompts::render;
use crate::role_mapper::{ChatMessage, ChatRole};
use crate::turn::AgentId;
use async_openai::{
    Client,
    config::OpenAIConfig,
    error::OpenAIError,
    types::{
        ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs, CreateChatCompletionResponse,
    },
};
use async_trait::async_trait;
use backoff::{ExponentialBackoff, ExponentialBackoffBuilder};
use std::time::Duration;
use tracing::debug;

/// Completion cap used when none is configured.
pub const DEFAULT_MAX_TOKENS: u32 = 150;

/// Answers the opener through the chat-completions endpoint.
///
/// Consumes the system-instructed view of the debate: a system message
/// followed by `user`/`assistant` turns.
pub struct OpenAIResponder {
    client: Client<OpenAIConfig>,
    model: String,
    max_tokens: u32,
    opening_prompt: String,
}

impl OpenAIResponder {
    /// Creates a responder.
    ///
    /// # Arguments
    ///
    /// * `config` - API key and base URL of the OpenAI-compatible service.
    /// * `model` - Chat model identifier (e.g., "gpt-4").
    /// * `opening_prompt` - Template used if this agent is ever asked to open.
    pub fn new(
        config: OpenAIConfig,
        model: impl Into<String>,
        opening_prompt: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::with_config(config).with_backoff(single_attempt()),
            model: model.into(),
            max_tokens: DEFAULT_MAX_TOKENS,
            opening_prompt: opening_prompt.into(),
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    fn fail(&self, cause: FailureCause) -> AgentFailure {
        AgentFailure::new(AgentId::Responder, cause)
    }

    async fn complete(&self, messages: Vec<ChatCompletionRequestMessage>) -> Result<String, AgentFailure> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .max_completion_tokens(self.max_tokens)
            .build()
            .map_err(|e| self.fail(FailureCause::Malformed(e.to_string())))?;

        debug!(model = %self.model, "Sending chat completion request");
        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| self.fail(classify(e)))?;

        first_choice_text(&response).map_err(|cause| self.fail(cause))
    }
}

#[async_trait]
impl AgentPort for OpenAIResponder {
    type Message = ChatMessage;

    fn agent_id(&self) -> AgentId {
        AgentId::Responder
    }

    async fn generate_opening(&self, topic: &str) -> Result<String, AgentFailure> {
        let opening = ChatMessage::new(ChatRole::User, render(&self.opening_prompt, topic));
        let messages = to_request_messages(vec![opening], None)
            .map_err(|e| self.fail(FailureCause::Malformed(e.to_string())))?;
        self.complete(messages).await
    }

    async fn continue_conversation(
        &self,
        native_history: Vec<ChatMessage>,
        latest_peer_text: &str,
    ) -> Result<String, AgentFailure> {
        let messages = to_request_messages(native_history, Some(latest_peer_text))
            .map_err(|e| self.fail(FailureCause::Malformed(e.to_string())))?;
        self.complete(messages).await
    }
}

/// A backoff that gives up after the first failed attempt, so rate limits
/// and server errors reach the caller instead of being re-sent.
fn single_attempt() -> ExponentialBackoff {
    ExponentialBackoffBuilder::new()
        .with_max_elapsed_time(Some(Duration::ZERO))
        .build()
}

/// Converts the native view into request messages, appending the peer's
/// newest text as the final `user` message.
pub fn to_request_messages(
    history: Vec<ChatMessage>,
    latest_peer_text: Option<&str>,
) -> Result<Vec<ChatCompletionRequestMessage>, OpenAIError> {
    let latest = latest_peer_text.map(|text| ChatMessage::new(ChatRole::User, text));
    history
        .into_iter()
        .chain(latest)
        .map(|msg| -> Result<ChatCompletionRequestMessage, OpenAIError> {
            Ok(match msg.role {
                ChatRole::System => ChatCompletionRequestSystemMessageArgs::default()
                    .content(msg.content)
                    .build()?
                    .into(),
                ChatRole::User => ChatCompletionRequestUserMessageArgs::default()
                    .content(msg.content)
                    .build()?
                    .into(),
                ChatRole::Assistant => ChatCompletionRequestAssistantMessageArgs::default()
                    .content(msg.content)
                    .build()?
                    .into(),
            })
        })
        .collect()
}

fn first_choice_text(response: &CreateChatCompletionResponse) -> Result<String, FailureCause> {
    let choice = response
        .choices
        .first()
        .ok_or_else(|| FailureCause::Malformed("no choices in response".to_string()))?;
    match choice.message.content.as_deref().map(str::trim) {
        Some(text) if !text.is_empty() => Ok(text.to_string()),
        _ => Err(FailureCause::EmptyResponse),
    }
}

fn classify(err: OpenAIError) -> FailureCause {
    match err {
        OpenAIError::ApiError(api) => FailureCause::Rejected(api.message),
        OpenAIError::JSONDeserialize(e) => FailureCause::Malformed(e.to_string()),
        other => FailureCause::Transport(other.to_string()),
    }
}
