//! Dialogue engine for the support agent
//!
//! Features:
//! - Per-session state with one lock per session record
//! - Catalog-driven responses with optional name personalization
//! - Quick-reply suggestions per intent
//! - Escalation offer for customers who stay frustrated

pub mod agent;
pub mod quick_replies;
pub mod session;

pub use agent::{ResponseGenerator, SupportAgent, TurnResult, ESCALATION_MESSAGE};
pub use quick_replies::{QuickReplyTable, ESCALATION_REPLIES};
pub use session::{
    InMemorySessionStore, Session, SessionData, SessionHandle, SessionHistory, SessionStore,
};

use thiserror::Error;

/// Agent errors
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Catalog error: {0}")]
    Catalog(#[from] support_agent_config::ConfigError),
}
