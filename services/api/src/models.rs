//! API Models
//!
//! Request and response bodies for the debate endpoints, annotated with
//! `utoipa` for the OpenAPI document.

use debate_core::{AgentId, DebateSession, ErrorKind, SessionState, Turn};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Body of `POST /api/start-debate` and `POST /api/debates`.
#[derive(Deserialize, ToSchema, Debug, Default)]
pub struct TopicPayload {
    /// Missing and blank topics are both reported as invalid input.
    #[serde(default)]
    #[schema(example = "Is remote work better?")]
    pub topic: Option<String>,
}

/// One entry of a client-held transcript.
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
pub struct TranscriptEntry {
    #[schema(value_type = String, example = "Opener")]
    pub speaker: AgentId,
    pub text: String,
}

/// Body of `POST /api/generate-next-turn`.
#[derive(Deserialize, ToSchema, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct NextTurnPayload {
    #[serde(default)]
    #[schema(example = "Is remote work better?")]
    pub topic: Option<String>,
    #[serde(default, alias = "history")]
    pub debate_history: Vec<TranscriptEntry>,
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
pub struct TurnView {
    #[schema(value_type = String, example = "Responder")]
    pub speaker: AgentId,
    pub text: String,
    pub sequence: u64,
}

impl From<&Turn> for TurnView {
    fn from(turn: &Turn) -> Self {
        Self {
            speaker: turn.speaker(),
            text: turn.text().to_string(),
            sequence: turn.sequence(),
        }
    }
}

pub fn turn_views(turns: &[Turn]) -> Vec<TurnView> {
    turns.iter().map(TurnView::from).collect()
}

#[derive(Serialize, ToSchema, Debug)]
#[serde(rename_all = "camelCase")]
pub struct StartDebateResponse {
    pub initial_message: TurnView,
}

#[derive(Serialize, ToSchema, Debug)]
#[serde(rename_all = "camelCase")]
pub struct NextTurnResponse {
    pub new_messages: Vec<TurnView>,
}

/// A debate held in the server-side session store.
#[derive(Serialize, ToSchema, Debug)]
pub struct DebateView {
    #[schema(value_type = String, format = Uuid)]
    pub id: Uuid,
    pub topic: String,
    #[schema(value_type = String, example = "InProgress")]
    pub state: SessionState,
    pub turns: Vec<TurnView>,
}

impl DebateView {
    pub fn new(id: Uuid, session: &DebateSession) -> Self {
        Self {
            id,
            topic: session.topic().to_string(),
            state: session.state(),
            turns: turn_views(session.history().turns()),
        }
    }
}

#[derive(Serialize, ToSchema, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AdvanceResponse {
    pub new_turns: Vec<TurnView>,
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    InvalidInput,
    NotInitialized,
    InvariantViolation,
    AgentFailure,
    NotFound,
    Busy,
}

impl From<ErrorKind> for ApiErrorKind {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::InvalidInput => ApiErrorKind::InvalidInput,
            ErrorKind::NotInitialized => ApiErrorKind::NotInitialized,
            ErrorKind::InvariantViolation => ApiErrorKind::InvariantViolation,
            ErrorKind::AgentFailure => ApiErrorKind::AgentFailure,
        }
    }
}

#[derive(Serialize, ToSchema, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub kind: ApiErrorKind,
    pub error: String,
    /// Turns committed before an agent failure, when the server keeps them.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub produced_turns: Vec<TurnView>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_turn_payload_reads_legacy_field_names() {
        let json = r#"{
            "topic": "Remote work",
            "debateHistory": [
                { "speaker": "Gemini", "text": "Remote is better." },
                { "speaker": "GPT", "text": "Offices foster collaboration." }
            ]
        }"#;

        let payload: NextTurnPayload = serde_json::from_str(json).unwrap();

        assert_eq!(payload.topic.as_deref(), Some("Remote work"));
        assert_eq!(payload.debate_history.len(), 2);
        assert_eq!(payload.debate_history[0].speaker, AgentId::Opener);
        assert_eq!(payload.debate_history[1].speaker, AgentId::Responder);
    }

    #[test]
    fn test_next_turn_payload_accepts_history_alias() {
        let json = r#"{ "topic": "T", "history": [{ "speaker": "Opener", "text": "A" }] }"#;
        let payload: NextTurnPayload = serde_json::from_str(json).unwrap();
        assert_eq!(payload.debate_history.len(), 1);
    }

    #[test]
    fn test_payloads_tolerate_missing_fields() {
        let topic: TopicPayload = serde_json::from_str("{}").unwrap();
        assert!(topic.topic.is_none());

        let next: NextTurnPayload = serde_json::from_str(r#"{ "topic": "T" }"#).unwrap();
        assert!(next.debate_history.is_empty());
    }

    #[test]
    fn test_unknown_speaker_is_rejected() {
        let json = r#"{ "topic": "T", "debateHistory": [{ "speaker": "Moderator", "text": "A" }] }"#;
        assert!(serde_json::from_str::<NextTurnPayload>(json).is_err());
    }

    #[test]
    fn test_start_response_uses_camel_case() {
        let response = StartDebateResponse {
            initial_message: TurnView::from(&Turn::new(AgentId::Opener, "Hello", 0)),
        };

        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "initialMessage": { "speaker": "Opener", "text": "Hello", "sequence": 0 }
            })
        );
    }

    #[test]
    fn test_error_response_omits_empty_produced_turns() {
        let error = ErrorResponse {
            kind: ApiErrorKind::InvalidInput,
            error: "a debate topic is required".to_string(),
            produced_turns: Vec::new(),
        };

        let json = serde_json::to_string(&error).unwrap();
        assert_eq!(
            json,
            r#"{"kind":"InvalidInput","error":"a debate topic is required"}"#
        );
    }

    #[test]
    fn test_error_response_lists_produced_turns() {
        let error = ErrorResponse {
            kind: ApiErrorKind::AgentFailure,
            error: "opener agent failed".to_string(),
            produced_turns: vec![TurnView::from(&Turn::new(AgentId::Responder, "B", 1))],
        };

        let json = serde_json::to_value(&error).unwrap();
        assert_eq!(json["producedTurns"][0]["speaker"], "Responder");
    }

    #[test]
    fn test_debate_view_reflects_session() {
        let session = DebateSession::from_transcript(
            "Topic",
            vec![(AgentId::Opener, "A"), (AgentId::Responder, "B")],
        )
        .unwrap();
        let id = Uuid::new_v4();

        let view = DebateView::new(id, &session);

        assert_eq!(view.id, id);
        assert_eq!(view.state, SessionState::InProgress);
        assert_eq!(view.turns.len(), 2);
        assert_eq!(view.turns[1].sequence, 1);
    }
}
