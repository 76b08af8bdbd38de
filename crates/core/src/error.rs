//! Error types surfaced by the debate core.

use crate::agent_port::AgentFailure;
use crate::history::HistoryError;
use crate::turn::Turn;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Machine-distinguishable error category, stable across the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    InvalidInput,
    NotInitialized,
    InvariantViolation,
    AgentFailure,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DebateError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("the debate has not been started")]
    NotInitialized,
    /// A history invariant was breached by the scheduler itself. This is a
    /// defect, not a user error.
    #[error("history invariant violated: {0}")]
    Invariant(#[from] HistoryError),
    /// An agent call failed. `produced` lists the turns of this advance that
    /// were committed before the failure (empty under the atomic policy).
    #[error("{failure}")]
    Agent {
        #[source]
        failure: AgentFailure,
        produced: Vec<Turn>,
    },
}

impl DebateError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DebateError::InvalidInput(_) => ErrorKind::InvalidInput,
            DebateError::NotInitialized => ErrorKind::NotInitialized,
            DebateError::Invariant(_) => ErrorKind::InvariantViolation,
            DebateError::Agent { .. } => ErrorKind::AgentFailure,
        }
    }
}

impl From<AgentFailure> for DebateError {
    fn from(failure: AgentFailure) -> Self {
        DebateError::Agent {
            failure,
            produced: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent_port::FailureCause;
    use crate::turn::AgentId;

    #[test]
    fn test_kinds() {
        assert_eq!(
            DebateError::InvalidInput("x".into()).kind(),
            ErrorKind::InvalidInput
        );
        assert_eq!(DebateError::NotInitialized.kind(), ErrorKind::NotInitialized);
        assert_eq!(
            DebateError::from(HistoryError::OpenerViolation {
                speaker: AgentId::Responder
            })
            .kind(),
            ErrorKind::InvariantViolation
        );
        let failure = AgentFailure::new(AgentId::Opener, FailureCause::EmptyResponse);
        assert_eq!(DebateError::from(failure).kind(), ErrorKind::AgentFailure);
    }

    #[test]
    fn test_agent_error_message_is_the_failure() {
        let failure = AgentFailure::new(
            AgentId::Responder,
            FailureCause::Rejected("invalid api key".into()),
        );
        let err = DebateError::from(failure);
        assert_eq!(
            err.to_string(),
            "responder agent failed: provider rejected the request: invalid api key"
        );
    }

    #[test]
    fn test_kind_serializes_as_name() {
        assert_eq!(
            serde_json::to_string(&ErrorKind::NotInitialized).unwrap(),
            "\"NotInitialized\""
        );
        assert_eq!(ErrorKind::AgentFailure.to_string(), "AgentFailure");
    }
}
