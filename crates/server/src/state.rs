//! Application State
//!
//! Shared state across all handlers.

use metrics_exporter_prometheus::PrometheusHandle;
use parking_lot::RwLock;
use std::sync::Arc;

use support_agent_agent::SupportAgent;
use support_agent_config::{IntentCatalog, Settings};

use crate::ServerError;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<RwLock<Settings>>,
    pub agent: Arc<SupportAgent>,
    /// Present when the Prometheus recorder is installed
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create state with an agent built from the settings
    pub fn new(config: Settings, catalog: IntentCatalog) -> Self {
        let agent = SupportAgent::new(catalog, &config.dialogue, &config.brand);
        Self::with_agent(config, agent)
    }

    /// Create state around a pre-built agent
    pub fn with_agent(config: Settings, agent: SupportAgent) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
            agent: Arc::new(agent),
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    /// Re-read the configured catalog file and swap it into the agent
    ///
    /// The current catalog stays in place if the file cannot be loaded.
    pub fn reload_catalog(&self) -> Result<usize, ServerError> {
        let path = self.config.read().dialogue.catalog_path.clone();
        let intents = self.agent.reload_catalog_from(&path)?;
        tracing::info!(path = %path, intents, "Catalog reloaded successfully");
        Ok(intents)
    }
}
