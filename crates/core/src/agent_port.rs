//! Agent Port
//!
//! The capability boundary for "send context, receive generated text". Each
//! debater is backed by one implementation, parameterised by the native
//! message type its role mapper produces.

use crate::turn::AgentId;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Why an upstream agent call did not yield usable text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FailureCause {
    /// The request never completed (connection, TLS, DNS, ...).
    #[error("transport error: {0}")]
    Transport(String),
    /// The provider answered with an error or refused the prompt.
    #[error("provider rejected the request: {0}")]
    Rejected(String),
    /// The provider answered with something that could not be decoded.
    #[error("malformed provider response: {0}")]
    Malformed(String),
    #[error("provider returned no text")]
    EmptyResponse,
    #[error("no reply within {0:?}")]
    Timeout(Duration),
}

/// A failed call to one debater.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{agent} agent failed: {cause}")]
pub struct AgentFailure {
    pub agent: AgentId,
    #[source]
    pub cause: FailureCause,
}

impl AgentFailure {
    pub fn new(agent: AgentId, cause: FailureCause) -> Self {
        Self { agent, cause }
    }
}

/// A conversational backend that can take a turn in a debate.
///
/// Implementations make exactly one outbound call per invocation and keep no
/// state between calls; the full context is passed in every time. Failures
/// are returned, never retried here.
#[async_trait]
pub trait AgentPort: Send + Sync {
    /// The native history entry this agent consumes.
    type Message: Send + 'static;

    fn agent_id(&self) -> AgentId;

    /// Produces the first utterance of a debate with no prior context.
    async fn generate_opening(&self, topic: &str) -> Result<String, AgentFailure>;

    /// Replies to `latest_peer_text`, given everything said before it.
    async fn continue_conversation(
        &self,
        native_history: Vec<Self::Message>,
        latest_peer_text: &str,
    ) -> Result<String, AgentFailure>;
}

#[async_trait]
impl<P> AgentPort for Arc<P>
where
    P: AgentPort + ?Sized,
{
    type Message = P::Message;

    fn agent_id(&self) -> AgentId {
        (**self).agent_id()
    }

    async fn generate_opening(&self, topic: &str) -> Result<String, AgentFailure> {
        (**self).generate_opening(topic).await
    }

    async fn continue_conversation(
        &self,
        native_history: Vec<Self::Message>,
        latest_peer_text: &str,
    ) -> Result<String, AgentFailure> {
        (**self)
            .continue_conversation(native_history, latest_peer_text)
            .await
    }
}
