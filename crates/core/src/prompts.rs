//! Prompt templates shared by the role mappers and agent adapters.
//!
//! Templates are plain text with a `{topic}` placeholder.

use std::collections::HashMap;

pub const DEFAULT_OPENING_PROMPT: &str = "We are starting a debate on the following topic. \
Please state your opening position. Topic: {topic}";

pub const DEFAULT_RESPONDER_SYSTEM_PROMPT: &str = "You are an AI taking part in a debate about \
'{topic}'. Rebut your opponent concisely and logically.";

/// Prompt key for the opening instruction (`opening.md` in a prompts directory).
pub const OPENING_KEY: &str = "opening";
/// Prompt key for the responder's system instruction (`responder_system.md`).
pub const RESPONDER_SYSTEM_KEY: &str = "responder_system";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebatePrompts {
    /// Sent as the literal first message when a debate is opened.
    pub opening: String,
    /// System-level instruction prepended to the responder's view.
    pub responder_system: String,
}

impl Default for DebatePrompts {
    fn default() -> Self {
        Self {
            opening: DEFAULT_OPENING_PROMPT.to_string(),
            responder_system: DEFAULT_RESPONDER_SYSTEM_PROMPT.to_string(),
        }
    }
}

impl DebatePrompts {
    /// Builds prompts from a template map, falling back to the built-in
    /// defaults for missing keys.
    pub fn from_templates(templates: &HashMap<String, String>) -> Self {
        let defaults = Self::default();
        let pick = |key: &str, fallback: String| {
            templates
                .get(key)
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .unwrap_or(fallback)
        };
        Self {
            opening: pick(OPENING_KEY, defaults.opening),
            responder_system: pick(RESPONDER_SYSTEM_KEY, defaults.responder_system),
        }
    }
}

/// Substitutes `topic` into a template.
pub fn render(template: &str, topic: &str) -> String {
    template.replace("{topic}", topic)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_substitutes_every_placeholder() {
        let rendered = render("{topic}? Really, {topic}?", "Tabs");
        assert_eq!(rendered, "Tabs? Really, Tabs?");
    }

    #[test]
    fn test_defaults_reference_topic() {
        let prompts = DebatePrompts::default();
        assert!(prompts.opening.contains("{topic}"));
        assert!(prompts.responder_system.contains("{topic}"));
    }

    #[test]
    fn test_from_templates_overrides_and_falls_back() {
        let mut templates = HashMap::new();
        templates.insert(OPENING_KEY.to_string(), "  Open on {topic}\n".to_string());
        templates.insert(RESPONDER_SYSTEM_KEY.to_string(), "   ".to_string());

        let prompts = DebatePrompts::from_templates(&templates);

        assert_eq!(prompts.opening, "Open on {topic}");
        assert_eq!(prompts.responder_system, DEFAULT_RESPONDER_SYSTEM_PROMPT);
    }
}
