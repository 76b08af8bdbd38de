//! Turn Scheduler
//!
//! Drives a debate: decides whose turn is next, projects the canonical history
//! into that agent's native view, calls the agent, and appends the reply.
//!
//! The next speaker is always the peer of the last one. For a history that
//! ends with the opener this yields the fixed order of an advance: the
//! responder reacts to the whole record first, then the opener reacts to the
//! responder's fresh point. Each agent sees everything said before it and
//! nothing said after.

use crate::agent_port::{AgentFailure, AgentPort, FailureCause};
use crate::error::DebateError;
use crate::history::CanonicalHistory;
use crate::prompts::DebatePrompts;
use crate::role_mapper::{
    ChatContent, ChatMessage, RoleMapper, StructuredChatMapper, SystemInstructedMapper,
};
use crate::session::DebateSession;
use crate::turn::{AgentId, Turn};
use std::future::Future;
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, instrument, warn};

/// Turns produced by one successful advance.
pub const TURNS_PER_ADVANCE: usize = 2;

/// What happens to the first turn of an advance when the second call fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PartialFailurePolicy {
    /// Nothing from a failed advance is kept.
    #[default]
    Atomic,
    /// Turns produced before the failure stay in the history and are
    /// reported in the error.
    KeepCompleted,
}

impl FromStr for PartialFailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "atomic" => Ok(Self::Atomic),
            "keep-completed" | "keep_completed" => Ok(Self::KeepCompleted),
            other => Err(format!(
                "'{}' is not a partial failure policy (expected 'atomic' or 'keep-completed')",
                other
            )),
        }
    }
}

pub struct TurnScheduler<O, R> {
    opener: O,
    responder: R,
    opener_mapper: StructuredChatMapper,
    responder_mapper: SystemInstructedMapper,
    policy: PartialFailurePolicy,
    timeout: Option<Duration>,
}

impl<O, R> TurnScheduler<O, R>
where
    O: AgentPort<Message = ChatContent>,
    R: AgentPort<Message = ChatMessage>,
{
    pub fn new(opener: O, responder: R, prompts: &DebatePrompts) -> Self {
        debug_assert_eq!(opener.agent_id(), AgentId::Opener);
        debug_assert_eq!(responder.agent_id(), AgentId::Responder);
        Self {
            opener,
            responder,
            opener_mapper: StructuredChatMapper,
            responder_mapper: SystemInstructedMapper::new(prompts.responder_system.clone()),
            policy: PartialFailurePolicy::default(),
            timeout: None,
        }
    }

    pub fn with_partial_failure_policy(mut self, policy: PartialFailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Bounds every agent call. An expired call is reported as an
    /// [`AgentFailure`] with [`FailureCause::Timeout`].
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn policy(&self) -> PartialFailurePolicy {
        self.policy
    }

    /// Creates a session for `topic` and records the opener's first turn.
    pub async fn start_debate(&self, topic: &str) -> Result<(DebateSession, Turn), DebateError> {
        let mut session = DebateSession::new(topic)?;
        let turn = self.open(&mut session).await?;
        Ok((session, turn))
    }

    /// Records the opening turn of an uninitialised session.
    #[instrument(skip(self, session), fields(topic = %session.topic()))]
    pub async fn open(&self, session: &mut DebateSession) -> Result<Turn, DebateError> {
        if !session.history().is_empty() {
            return Err(DebateError::InvalidInput(
                "the debate has already been opened".to_string(),
            ));
        }

        let text = self
            .call(AgentId::Opener, self.opener.generate_opening(session.topic()))
            .await
            .inspect_err(|failure| warn!(error = %failure, "Opening turn failed"))?;

        let mut staged = session.history().clone();
        let turn = Turn::new(AgentId::Opener, text, staged.next_sequence());
        staged.append(turn.clone())?;
        session.commit(staged);

        info!(sequence = turn.sequence(), "Debate opened");
        Ok(turn)
    }

    /// Produces the next pair of turns.
    ///
    /// Requires an opened session. On an agent failure the history is left
    /// as the [`PartialFailurePolicy`] dictates; nothing is retried.
    #[instrument(skip(self, session), fields(topic = %session.topic(), turns = session.history().len()))]
    pub async fn advance_turn(&self, session: &mut DebateSession) -> Result<Vec<Turn>, DebateError> {
        if session.history().is_empty() {
            return Err(DebateError::NotInitialized);
        }

        let mut staged = session.history().clone();
        let start = staged.len();

        for _ in 0..TURNS_PER_ADVANCE {
            let speaker = staged.next_speaker();
            match self.reply(session.topic(), &staged, speaker).await {
                Ok(text) => {
                    let turn = Turn::new(speaker, text, staged.next_sequence());
                    info!(%speaker, sequence = turn.sequence(), "Turn recorded");
                    staged.append(turn)?;
                }
                Err(failure) => {
                    warn!(error = %failure, policy = ?self.policy, "Advance aborted");
                    let produced = match self.policy {
                        PartialFailurePolicy::Atomic => Vec::new(),
                        PartialFailurePolicy::KeepCompleted => {
                            let produced = staged.turns()[start..].to_vec();
                            if !produced.is_empty() {
                                session.commit(staged);
                            }
                            produced
                        }
                    };
                    return Err(DebateError::Agent { failure, produced });
                }
            }
        }

        let produced = staged.turns()[start..].to_vec();
        session.commit(staged);
        Ok(produced)
    }

    /// Asks `speaker` to reply to the newest turn, given everything before it.
    async fn reply(
        &self,
        topic: &str,
        history: &CanonicalHistory,
        speaker: AgentId,
    ) -> Result<String, AgentFailure> {
        let (earlier, latest) = history.split_latest().ok_or_else(|| {
            AgentFailure::new(
                speaker,
                FailureCause::Malformed("nothing to reply to".to_string()),
            )
        })?;

        match speaker {
            AgentId::Responder => {
                let native = self.responder_mapper.project(topic, earlier, speaker);
                self.call(
                    speaker,
                    self.responder.continue_conversation(native, latest.text()),
                )
                .await
            }
            AgentId::Opener => {
                let native = self.opener_mapper.project(topic, earlier, speaker);
                self.call(
                    speaker,
                    self.opener.continue_conversation(native, latest.text()),
                )
                .await
            }
        }
    }

    async fn call<F>(&self, agent: AgentId, request: F) -> Result<String, AgentFailure>
    where
        F: Future<Output = Result<String, AgentFailure>>,
    {
        let text = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, request)
                .await
                .map_err(|_| AgentFailure::new(agent, FailureCause::Timeout(limit)))??,
            None => request.await?,
        };

        if text.trim().is_empty() {
            return Err(AgentFailure::new(agent, FailureCause::EmptyResponse));
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_from_str() {
        assert_eq!(
            "atomic".parse::<PartialFailurePolicy>().unwrap(),
            PartialFailurePolicy::Atomic
        );
        assert_eq!(
            " Keep-Completed ".parse::<PartialFailurePolicy>().unwrap(),
            PartialFailurePolicy::KeepCompleted
        );
        assert!("sometimes".parse::<PartialFailurePolicy>().is_err());
    }

    #[test]
    fn test_policy_defaults_to_atomic() {
        assert_eq!(PartialFailurePolicy::default(), PartialFailurePolicy::Atomic);
    }
}
