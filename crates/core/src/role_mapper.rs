//! Role Mapping Strategies
//!
//! Each agent family labels chat history with its own role vocabulary. A
//! [`RoleMapper`] projects the canonical turns into one of those vocabularies
//! from the point of view of a single debater: turns that debater authored
//! become its "self" role, everything else becomes "peer" input.
//!
//! Projections are pure. They borrow the turns, never mutate them, and the
//! same arguments always produce the same messages.

use crate::prompts::render;
use crate::turn::{AgentId, Turn};
use serde::{Deserialize, Serialize};

/// A pure projection from canonical turns into an agent's native messages.
pub trait RoleMapper {
    type Message;

    fn project(&self, topic: &str, turns: &[Turn], perspective: AgentId) -> Vec<Self::Message>;
}

// --- System-instructed (flat chat-completions) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// One entry of a flat request/response message list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Prepends a system instruction rendered from the topic, then labels the
/// perspective agent's turns `assistant` and the peer's turns `user`.
#[derive(Debug, Clone)]
pub struct SystemInstructedMapper {
    system_template: String,
}

impl SystemInstructedMapper {
    pub fn new(system_template: impl Into<String>) -> Self {
        Self {
            system_template: system_template.into(),
        }
    }
}

impl RoleMapper for SystemInstructedMapper {
    type Message = ChatMessage;

    fn project(&self, topic: &str, turns: &[Turn], perspective: AgentId) -> Vec<ChatMessage> {
        let instruction = ChatMessage::new(ChatRole::System, render(&self.system_template, topic));
        std::iter::once(instruction)
            .chain(turns.iter().map(|turn| {
                let role = if turn.speaker() == perspective {
                    ChatRole::Assistant
                } else {
                    ChatRole::User
                };
                ChatMessage::new(role, turn.text())
            }))
            .collect()
    }
}

// --- Structured-chat (multi-turn content list) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentRole {
    User,
    Model,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    pub text: String,
}

/// One entry of a native multi-turn chat history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatContent {
    pub role: ContentRole,
    pub parts: Vec<Part>,
}

impl ChatContent {
    pub fn text(role: ContentRole, text: impl Into<String>) -> Self {
        Self {
            role,
            parts: vec![Part { text: text.into() }],
        }
    }
}

/// Labels the perspective agent's turns `model` and the peer's turns `user`.
///
/// There is no system message; the opening instruction is sent as the first
/// conversational message instead. An empty history projects to an empty list.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuredChatMapper;

impl RoleMapper for StructuredChatMapper {
    type Message = ChatContent;

    fn project(&self, _topic: &str, turns: &[Turn], perspective: AgentId) -> Vec<ChatContent> {
        turns
            .iter()
            .map(|turn| {
                let role = if turn.speaker() == perspective {
                    ContentRole::Model
                } else {
                    ContentRole::User
                };
                ChatContent::text(role, turn.text())
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_turns() -> Vec<Turn> {
        vec![
            Turn::new(AgentId::Opener, "A", 0),
            Turn::new(AgentId::Responder, "B", 1),
        ]
    }

    #[test]
    fn test_system_instructed_labels_from_responder_view() {
        let mapper = SystemInstructedMapper::new("Debate about '{topic}'.");

        let messages = mapper.project("Remote work", &sample_turns(), AgentId::Responder);

        assert_eq!(
            messages,
            vec![
                ChatMessage::new(ChatRole::System, "Debate about 'Remote work'."),
                ChatMessage::new(ChatRole::User, "A"),
                ChatMessage::new(ChatRole::Assistant, "B"),
            ]
        );
    }

    #[test]
    fn test_system_instructed_empty_history_keeps_instruction() {
        let mapper = SystemInstructedMapper::new("{topic}");

        let messages = mapper.project("Cats", &[], AgentId::Responder);

        assert_eq!(messages, vec![ChatMessage::new(ChatRole::System, "Cats")]);
    }

    #[test]
    fn test_structured_chat_labels_from_opener_view() {
        let contents = StructuredChatMapper.project("ignored", &sample_turns(), AgentId::Opener);

        assert_eq!(
            contents,
            vec![
                ChatContent::text(ContentRole::Model, "A"),
                ChatContent::text(ContentRole::User, "B"),
            ]
        );
    }

    #[test]
    fn test_structured_chat_empty_history_is_empty() {
        let contents = StructuredChatMapper.project("Cats", &[], AgentId::Opener);
        assert!(contents.is_empty());
    }

    #[test]
    fn test_projection_is_pure() {
        let turns = sample_turns();
        let before = turns.clone();
        let mapper = SystemInstructedMapper::new("{topic}");

        let first = mapper.project("Topic", &turns, AgentId::Responder);
        let second = mapper.project("Topic", &turns, AgentId::Responder);
        let chat_first = StructuredChatMapper.project("Topic", &turns, AgentId::Opener);
        let chat_second = StructuredChatMapper.project("Topic", &turns, AgentId::Opener);

        assert_eq!(first, second);
        assert_eq!(chat_first, chat_second);
        assert_eq!(turns, before);
    }

    #[test]
    fn test_native_roles_serialize_lowercase() {
        let content = ChatContent::text(ContentRole::Model, "hi");
        let json = serde_json::to_value(&content).unwrap();

        assert_eq!(json["role"], "model");
        assert_eq!(json["parts"][0]["text"], "hi");
        assert_eq!(
            serde_json::to_value(ChatRole::Assistant).unwrap(),
            "assistant"
        );
    }
}
