//! Shared Application State
//!
//! This module defines the `AppState` struct, which holds the debate
//! scheduler and the server-side session store.

use crate::store::SessionStore;
use debate_core::{AgentPort, ChatContent, ChatMessage, TurnScheduler};
use std::sync::Arc;

pub type OpenerPort = Arc<dyn AgentPort<Message = ChatContent>>;
pub type ResponderPort = Arc<dyn AgentPort<Message = ChatMessage>>;
pub type DebateScheduler = TurnScheduler<OpenerPort, ResponderPort>;

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub scheduler: Arc<DebateScheduler>,
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    pub fn new(scheduler: DebateScheduler) -> Self {
        Self {
            scheduler: Arc::new(scheduler),
            sessions: Arc::new(SessionStore::new()),
        }
    }
}
