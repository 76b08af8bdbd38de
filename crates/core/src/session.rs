//! Debate Session
//!
//! The unit handed to the transport layer: a topic, its canonical history and
//! a lifecycle state. Only the [`TurnScheduler`](crate::scheduler::TurnScheduler)
//! mutates a session once it exists.

use crate::error::DebateError;
use crate::history::CanonicalHistory;
use crate::turn::{AgentId, Turn};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// Created, but the opener has not spoken yet.
    Uninitialized,
    /// Exactly the opening turn has been recorded.
    Opened,
    /// At least one advance has completed.
    InProgress,
}

#[derive(Debug, Clone)]
pub struct DebateSession {
    topic: String,
    history: CanonicalHistory,
    state: SessionState,
}

impl DebateSession {
    /// Creates an empty session. The topic must not be blank.
    pub fn new(topic: &str) -> Result<Self, DebateError> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(DebateError::InvalidInput(
                "a debate topic is required".to_string(),
            ));
        }
        Ok(Self {
            topic: topic.to_string(),
            history: CanonicalHistory::new(),
            state: SessionState::Uninitialized,
        })
    }

    /// Rebuilds a session from a client-held transcript.
    ///
    /// Sequence numbers are reassigned in order. A transcript that breaks the
    /// history invariants is rejected as invalid input.
    pub fn from_transcript<I, S>(topic: &str, transcript: I) -> Result<Self, DebateError>
    where
        I: IntoIterator<Item = (AgentId, S)>,
        S: Into<String>,
    {
        let mut session = Self::new(topic)?;
        for (speaker, text) in transcript {
            let turn = Turn::new(speaker, text, session.history.next_sequence());
            session
                .history
                .append(turn)
                .map_err(|e| DebateError::InvalidInput(format!("malformed debate history: {}", e)))?;
        }
        session.state = match session.history.len() {
            0 => SessionState::Uninitialized,
            1 => SessionState::Opened,
            _ => SessionState::InProgress,
        };
        Ok(session)
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn history(&self) -> &CanonicalHistory {
        &self.history
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Replaces the history with a staged copy and moves the lifecycle forward.
    pub(crate) fn commit(&mut self, history: CanonicalHistory) {
        self.history = history;
        self.state = match (self.state, self.history.len()) {
            (_, 0) => SessionState::Uninitialized,
            (SessionState::Uninitialized, _) => SessionState::Opened,
            _ => SessionState::InProgress,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trims_and_rejects_blank_topic() {
        let session = DebateSession::new("  Is remote work better?  ").unwrap();
        assert_eq!(session.topic(), "Is remote work better?");
        assert_eq!(session.state(), SessionState::Uninitialized);
        assert!(session.history().is_empty());

        assert!(matches!(
            DebateSession::new("   "),
            Err(DebateError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_from_transcript_assigns_sequences_and_state() {
        let session = DebateSession::from_transcript(
            "Tabs vs spaces",
            vec![
                (AgentId::Opener, "Tabs"),
                (AgentId::Responder, "Spaces"),
                (AgentId::Opener, "Tabs, again"),
            ],
        )
        .unwrap();

        let sequences: Vec<u64> = session.history().to_sequence().map(Turn::sequence).collect();
        assert_eq!(sequences, vec![0, 1, 2]);
        assert_eq!(session.state(), SessionState::InProgress);
    }

    #[test]
    fn test_from_transcript_opened_state() {
        let session =
            DebateSession::from_transcript("Topic", vec![(AgentId::Opener, "A")]).unwrap();
        assert_eq!(session.state(), SessionState::Opened);
    }

    #[test]
    fn test_from_transcript_rejects_broken_alternation() {
        let err = DebateSession::from_transcript(
            "Topic",
            vec![(AgentId::Opener, "A"), (AgentId::Opener, "B")],
        )
        .unwrap_err();

        match err {
            DebateError::InvalidInput(message) => assert!(message.contains("twice in a row")),
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_commit_moves_lifecycle_forward() {
        let mut session = DebateSession::new("Topic").unwrap();

        let mut staged = session.history().clone();
        staged.append(Turn::new(AgentId::Opener, "A", 0)).unwrap();
        session.commit(staged);
        assert_eq!(session.state(), SessionState::Opened);

        let mut staged = session.history().clone();
        staged.append(Turn::new(AgentId::Responder, "B", 1)).unwrap();
        staged.append(Turn::new(AgentId::Opener, "C", 2)).unwrap();
        session.commit(staged);
        assert_eq!(session.state(), SessionState::InProgress);
        assert_eq!(session.history().len(), 3);
    }
}
