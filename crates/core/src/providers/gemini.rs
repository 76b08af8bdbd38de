//! Opener adapter for Google Gemini's `generateContent` REST endpoint.

use crate::agent_port::{AgentFailure, AgentPort, FailureCause};
use crate::prompts::render;
use crate::role_mapper::{ChatContent, ContentRole};
use crate::turn::AgentId;
use async_trait::async_trait;
use tracing::debug;

pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

// --- Local Gemini REST Types ---
mod gemini_types {
    use crate::role_mapper::ChatContent;
    use serde::{Deserialize, Serialize};

    #[derive(Serialize)]
    pub(super) struct GenerateContentRequest<'a> {
        pub contents: &'a [ChatContent],
    }

    #[derive(Deserialize, Debug)]
    #[serde(rename_all = "camelCase")]
    pub(super) struct GenerateContentResponse {
        #[serde(default)]
        pub candidates: Vec<Candidate>,
        pub prompt_feedback: Option<PromptFeedback>,
    }

    #[derive(Deserialize, Debug)]
    #[serde(rename_all = "camelCase")]
    pub(super) struct Candidate {
        pub content: Option<CandidateContent>,
        pub finish_reason: Option<String>,
    }

    #[derive(Deserialize, Debug)]
    pub(super) struct CandidateContent {
        #[serde(default)]
        pub parts: Vec<ResponsePart>,
    }

    #[derive(Deserialize, Debug)]
    pub(super) struct ResponsePart {
        pub text: Option<String>,
    }

    #[derive(Deserialize, Debug)]
    #[serde(rename_all = "camelCase")]
    pub(super) struct PromptFeedback {
        pub block_reason: Option<String>,
    }

    #[derive(Deserialize, Debug)]
    pub(super) struct ErrorEnvelope {
        pub error: ErrorBody,
    }

    #[derive(Deserialize, Debug)]
    pub(super) struct ErrorBody {
        pub message: String,
    }
}

use gemini_types::{ErrorEnvelope, GenerateContentRequest, GenerateContentResponse};

/// Opens the debate and answers the responder through a multi-turn chat.
///
/// Consumes the structured-chat view: `user`/`model` contents with no system
/// message. The opening instruction is sent as the first user message.
pub struct GeminiOpener {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
    opening_prompt: String,
}

impl GeminiOpener {
    pub fn new(
        api_key: impl Into<String>,
        model: &str,
        opening_prompt: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            model: normalize_model(model),
            base_url: GEMINI_API_BASE.to_string(),
            opening_prompt: opening_prompt.into(),
        }
    }

    /// Points the adapter at a different API root (e.g., a proxy).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    fn fail(&self, cause: FailureCause) -> AgentFailure {
        AgentFailure::new(AgentId::Opener, cause)
    }

    async fn generate(&self, contents: &[ChatContent]) -> Result<String, AgentFailure> {
        debug!(model = %self.model, turns = contents.len(), "Sending generateContent request");
        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&GenerateContentRequest { contents })
            .send()
            .await
            .map_err(|e| self.fail(FailureCause::Transport(e.to_string())))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.fail(FailureCause::Transport(e.to_string())))?;

        if !status.is_success() {
            return Err(self.fail(FailureCause::Rejected(error_message(status.as_u16(), &body))));
        }

        parse_reply(&body).map_err(|cause| self.fail(cause))
    }
}

#[async_trait]
impl AgentPort for GeminiOpener {
    type Message = ChatContent;

    fn agent_id(&self) -> AgentId {
        AgentId::Opener
    }

    async fn generate_opening(&self, topic: &str) -> Result<String, AgentFailure> {
        self.generate(&opening_contents(&self.opening_prompt, topic)).await
    }

    async fn continue_conversation(
        &self,
        native_history: Vec<ChatContent>,
        latest_peer_text: &str,
    ) -> Result<String, AgentFailure> {
        self.generate(&conversation_contents(native_history, latest_peer_text)).await
    }
}

/// A fresh chat whose only message is the rendered opening instruction.
pub fn opening_contents(template: &str, topic: &str) -> Vec<ChatContent> {
    vec![ChatContent::text(ContentRole::User, render(template, topic))]
}

/// The native view followed by the peer's newest text as a `user` message.
pub fn conversation_contents(
    mut history: Vec<ChatContent>,
    latest_peer_text: &str,
) -> Vec<ChatContent> {
    history.push(ChatContent::text(ContentRole::User, latest_peer_text));
    history
}

/// Accepts both `gemini-1.5-flash` and `models/gemini-1.5-flash`.
fn normalize_model(model: &str) -> String {
    model.trim().trim_start_matches("models/").to_string()
}

fn parse_reply(body: &str) -> Result<String, FailureCause> {
    let response: GenerateContentResponse =
        serde_json::from_str(body).map_err(|e| FailureCause::Malformed(e.to_string()))?;

    if let Some(reason) = response
        .prompt_feedback
        .as_ref()
        .and_then(|feedback| feedback.block_reason.as_ref())
    {
        return Err(FailureCause::Rejected(format!("prompt blocked: {}", reason)));
    }

    let candidate = response.candidates.first().ok_or(FailureCause::EmptyResponse)?;
    let text: String = candidate
        .content
        .iter()
        .flat_map(|content| content.parts.iter())
        .filter_map(|part| part.text.as_deref())
        .collect();

    if text.trim().is_empty() {
        return Err(match candidate.finish_reason.as_deref() {
            Some(reason @ ("SAFETY" | "RECITATION" | "BLOCKLIST")) => {
                FailureCause::Rejected(format!("response withheld: {}", reason))
            }
            _ => FailureCause::EmptyResponse,
        });
    }
    Ok(text.trim().to_string())
}

fn error_message(status: u16, body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => format!("{} (HTTP {})", envelope.error.message, status),
        Err(_) => format!("HTTP {}", status),
    }
}
