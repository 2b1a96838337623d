//! Support Agent Server
//!
//! HTTP endpoints for chat turns, session history, health and metrics.

pub mod http;
pub mod metrics;
pub mod state;

pub use http::create_router;
pub use metrics::{init_metrics, record_escalation, record_session_cleared, record_turn};
pub use state::AppState;

use support_agent_agent::AgentError;
use thiserror::Error;

/// Server errors
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Catalog error: {0}")]
    Catalog(String),
}

impl From<AgentError> for ServerError {
    fn from(err: AgentError) -> Self {
        match err {
            AgentError::Catalog(e) => ServerError::Catalog(e.to_string()),
        }
    }
}

impl From<ServerError> for axum::http::StatusCode {
    fn from(err: ServerError) -> Self {
        match err {
            ServerError::Catalog(_) => axum::http::StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}
