use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies one of the two debaters.
///
/// The same value tags turns in the canonical history and selects which
/// agent port and role-mapping strategy applies to a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgentId {
    /// Speaks first; backed by the structured-chat agent.
    #[serde(alias = "Gemini")]
    Opener,
    /// Answers the opener; backed by the system-instructed agent.
    #[serde(alias = "GPT")]
    Responder,
}

impl AgentId {
    /// The other side of the debate.
    pub fn peer(self) -> Self {
        match self {
            AgentId::Opener => AgentId::Responder,
            AgentId::Responder => AgentId::Opener,
        }
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentId::Opener => write!(f, "opener"),
            AgentId::Responder => write!(f, "responder"),
        }
    }
}

/// One attributed utterance in a debate.
///
/// Turns are immutable once created. The sequence number is assigned by
/// whoever appends the turn to a history, never by an agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    speaker: AgentId,
    text: String,
    sequence: u64,
}

impl Turn {
    pub fn new(speaker: AgentId, text: impl Into<String>, sequence: u64) -> Self {
        Self {
            speaker,
            text: text.into(),
            sequence,
        }
    }

    pub fn speaker(&self) -> AgentId {
        self.speaker
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peer_is_symmetric() {
        assert_eq!(AgentId::Opener.peer(), AgentId::Responder);
        assert_eq!(AgentId::Responder.peer(), AgentId::Opener);
        assert_eq!(AgentId::Opener.peer().peer(), AgentId::Opener);
    }

    #[test]
    fn test_agent_id_accepts_legacy_labels() {
        let opener: AgentId = serde_json::from_str("\"Gemini\"").unwrap();
        let responder: AgentId = serde_json::from_str("\"GPT\"").unwrap();

        assert_eq!(opener, AgentId::Opener);
        assert_eq!(responder, AgentId::Responder);
        assert_eq!(serde_json::to_string(&opener).unwrap(), "\"Opener\"");
    }

    #[test]
    fn test_agent_id_rejects_unknown_label() {
        let result: Result<AgentId, _> = serde_json::from_str("\"Claude\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_turn_accessors() {
        let turn = Turn::new(AgentId::Responder, "Counterpoint", 3);
        assert_eq!(turn.speaker(), AgentId::Responder);
        assert_eq!(turn.text(), "Counterpoint");
        assert_eq!(turn.sequence(), 3);
    }
}
