//! Canonical Debate History
//!
//! The provider-neutral, append-only record of every turn in a debate. All
//! provider-specific views are projected from this record and nothing else.

use crate::turn::{AgentId, Turn};

/// Invariant breaches detected when appending to a [`CanonicalHistory`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HistoryError {
    #[error("turn sequence {found} does not follow history of length {expected}")]
    SequenceViolation { expected: u64, found: u64 },
    #[error("{speaker} cannot speak twice in a row (sequence {sequence})")]
    AlternationViolation { speaker: AgentId, sequence: u64 },
    #[error("the debate must be opened by the opener, not the {speaker}")]
    OpenerViolation { speaker: AgentId },
}

/// Ordered, append-only sequence of turns.
///
/// Sequence numbers form a gap-free run starting at 0, the first speaker is
/// always [`AgentId::Opener`], and no speaker appears twice in a row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CanonicalHistory {
    turns: Vec<Turn>,
}

impl CanonicalHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a turn after checking it against every history invariant.
    pub fn append(&mut self, turn: Turn) -> Result<(), HistoryError> {
        let expected = self.turns.len() as u64;
        if turn.sequence() != expected {
            return Err(HistoryError::SequenceViolation {
                expected,
                found: turn.sequence(),
            });
        }

        match self.turns.last() {
            None if turn.speaker() != AgentId::Opener => {
                return Err(HistoryError::OpenerViolation {
                    speaker: turn.speaker(),
                });
            }
            Some(last) if last.speaker() == turn.speaker() => {
                return Err(HistoryError::AlternationViolation {
                    speaker: turn.speaker(),
                    sequence: turn.sequence(),
                });
            }
            _ => {}
        }

        self.turns.push(turn);
        Ok(())
    }

    /// A lazy, read-only view of the turns in insertion order.
    ///
    /// The returned iterator is `Clone`, so it can be restarted; calling this
    /// again without an intervening append yields the same turns.
    pub fn to_sequence(&self) -> impl Iterator<Item = &Turn> + Clone + '_ {
        self.turns.iter()
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    /// Sequence number the next appended turn must carry.
    pub fn next_sequence(&self) -> u64 {
        self.turns.len() as u64
    }

    /// Who must speak next for the alternation invariant to hold.
    pub fn next_speaker(&self) -> AgentId {
        self.turns
            .last()
            .map(|turn| turn.speaker().peer())
            .unwrap_or(AgentId::Opener)
    }

    /// Splits off the newest turn from everything said before it.
    pub fn split_latest(&self) -> Option<(&[Turn], &Turn)> {
        self.turns
            .split_last()
            .map(|(latest, earlier)| (earlier, latest))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history_of(speakers: &[AgentId]) -> CanonicalHistory {
        let mut history = CanonicalHistory::new();
        for (i, speaker) in speakers.iter().enumerate() {
            history
                .append(Turn::new(*speaker, format!("turn {}", i), i as u64))
                .unwrap();
        }
        history
    }

    #[test]
    fn test_append_accepts_alternating_turns() {
        let history = history_of(&[AgentId::Opener, AgentId::Responder, AgentId::Opener]);

        assert_eq!(history.len(), 3);
        assert_eq!(history.next_sequence(), 3);
        assert_eq!(history.next_speaker(), AgentId::Responder);
        assert_eq!(history.last().map(Turn::text), Some("turn 2"));
    }

    #[test]
    fn test_append_rejects_sequence_gap() {
        let mut history = history_of(&[AgentId::Opener]);

        let err = history
            .append(Turn::new(AgentId::Responder, "late", 5))
            .unwrap_err();

        assert_eq!(
            err,
            HistoryError::SequenceViolation {
                expected: 1,
                found: 5
            }
        );
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_append_rejects_repeated_speaker() {
        let mut history = history_of(&[AgentId::Opener]);

        let err = history
            .append(Turn::new(AgentId::Opener, "again", 1))
            .unwrap_err();

        assert!(matches!(
            err,
            HistoryError::AlternationViolation {
                speaker: AgentId::Opener,
                sequence: 1
            }
        ));
    }

    #[test]
    fn test_append_rejects_responder_first() {
        let mut history = CanonicalHistory::new();

        let err = history
            .append(Turn::new(AgentId::Responder, "too early", 0))
            .unwrap_err();

        assert_eq!(
            err,
            HistoryError::OpenerViolation {
                speaker: AgentId::Responder
            }
        );
        assert!(history.is_empty());
    }

    #[test]
    fn test_to_sequence_is_restartable() {
        let history = history_of(&[AgentId::Opener, AgentId::Responder]);

        let view = history.to_sequence();
        let first: Vec<_> = view.clone().collect();
        let second: Vec<_> = view.collect();
        let third: Vec<_> = history.to_sequence().collect();

        assert_eq!(first, second);
        assert_eq!(first, third);
        assert_eq!(
            first.iter().map(|t| t.sequence()).collect::<Vec<_>>(),
            vec![0, 1]
        );
    }

    #[test]
    fn test_empty_history_expects_opener() {
        let history = CanonicalHistory::new();
        assert_eq!(history.next_speaker(), AgentId::Opener);
        assert!(history.split_latest().is_none());
    }

    #[test]
    fn test_split_latest() {
        let history = history_of(&[AgentId::Opener, AgentId::Responder, AgentId::Opener]);

        let (earlier, latest) = history.split_latest().unwrap();

        assert_eq!(earlier.len(), 2);
        assert_eq!(latest.sequence(), 2);
        assert_eq!(latest.speaker(), AgentId::Opener);
    }
}
