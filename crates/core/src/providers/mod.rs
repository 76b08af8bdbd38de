//! Concrete agent adapters.
//!
//! Credentials and model names are injected at construction; nothing here
//! reads process-wide state.

pub mod gemini;
pub mod openai;

pub use gemini::GeminiOpener;
pub use openai::OpenAIResponder;
