//! Debate Core
//!
//! Orchestrates a debate between two conversational agents with incompatible
//! chat-history schemas. One canonical, provider-neutral history is the
//! source of truth; on every turn it is projected into the native role
//! vocabulary of the agent about to speak.

pub mod agent_port;
pub mod error;
pub mod history;
pub mod prompts;
pub mod providers;
pub mod role_mapper;
pub mod scheduler;
pub mod session;
pub mod turn;

pub use agent_port::{AgentFailure, AgentPort, FailureCause};
pub use error::{DebateError, ErrorKind};
pub use history::{CanonicalHistory, HistoryError};
pub use prompts::DebatePrompts;
pub use role_mapper::{
    ChatContent, ChatMessage, ChatRole, ContentRole, RoleMapper, StructuredChatMapper,
    SystemInstructedMapper,
};
pub use scheduler::{PartialFailurePolicy, TurnScheduler};
pub use session::{DebateSession, SessionState};
pub use turn::{AgentId, Turn};
