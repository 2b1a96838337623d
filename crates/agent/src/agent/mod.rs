//! Support Agent
//!
//! Per-turn entry point. A turn is a straight pipeline with one branch:
//! resolve the session, log the inbound message, score sentiment, then either
//! offer escalation or classify and answer.

mod response;

pub use response::{ResponseGenerator, ESCALATION_MESSAGE};

use parking_lot::RwLock;
use rand::rngs::StdRng;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

use support_agent_config::constants::intents;
use support_agent_config::{BrandConfig, DialogueConfig, IntentCatalog};
use support_agent_core::{Sentiment, SentimentScorer, TurnRole};
use support_agent_text_processing::{IntentClassifier, LexiconSentimentAnalyzer};

use crate::quick_replies::{QuickReplyTable, ESCALATION_REPLIES};
use crate::session::{InMemorySessionStore, SessionHistory, SessionStore};
use crate::AgentError;

/// Outcome of one turn
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TurnResult {
    pub response: String,
    pub intent: String,
    pub sentiment: Sentiment,
    pub quick_replies: Vec<String>,
    /// Name known for the session after this turn
    pub name: Option<String>,
    pub session_id: String,
}

impl TurnResult {
    pub fn is_escalation(&self) -> bool {
        self.intent == intents::ESCALATION
    }
}

/// Rule-based customer support agent
pub struct SupportAgent {
    sessions: Arc<dyn SessionStore>,
    sentiment: Arc<dyn SentimentScorer>,
    /// Swapped whole on catalog reload
    classifier: RwLock<Arc<IntentClassifier>>,
    responder: ResponseGenerator,
    quick_replies: QuickReplyTable,
    /// Escalate when the session's message count exceeds this
    escalation_threshold: usize,
    default_session_id: String,
}

impl SupportAgent {
    /// Agent with in-memory sessions and the lexicon sentiment scorer
    pub fn new(catalog: IntentCatalog, dialogue: &DialogueConfig, brand: &BrandConfig) -> Self {
        Self {
            sessions: Arc::new(InMemorySessionStore::new()),
            sentiment: Arc::new(LexiconSentimentAnalyzer::new()),
            classifier: RwLock::new(Arc::new(IntentClassifier::new(Arc::new(catalog)))),
            responder: ResponseGenerator::new(dialogue.personalization.clone(), brand.clone()),
            quick_replies: QuickReplyTable::new(brand),
            escalation_threshold: dialogue.escalation_threshold,
            default_session_id: dialogue.default_session_id.clone(),
        }
    }

    /// Replace the session store
    pub fn with_session_store(mut self, sessions: Arc<dyn SessionStore>) -> Self {
        self.sessions = sessions;
        self
    }

    /// Replace the sentiment scorer
    pub fn with_sentiment_scorer(mut self, sentiment: Arc<dyn SentimentScorer>) -> Self {
        self.sentiment = sentiment;
        self
    }

    /// Seed response selection and personalization
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.responder = ResponseGenerator::with_rng(
            self.responder.personalization().clone(),
            self.responder.brand().clone(),
            rng,
        );
        self
    }

    /// Process one inbound message
    ///
    /// Never fails: a blank session id maps to the default session and a
    /// failing sentiment scorer counts as neutral.
    pub fn process_turn(&self, session_id: &str, message: &str) -> TurnResult {
        let session_id = self.resolve_session_id(session_id);
        let handle = self.sessions.get_or_create(&session_id);
        let mut session = handle.lock();

        session.record(TurnRole::User, message);

        let sentiment = match self.sentiment.score(message) {
            Ok(sentiment) => sentiment,
            Err(e) => {
                tracing::warn!(session_id = %session_id, error = %e, "Sentiment scoring failed, assuming neutral");
                Sentiment::Neutral
            },
        };

        if sentiment.is_negative() && session.message_count > self.escalation_threshold {
            tracing::info!(
                session_id = %session_id,
                message_count = session.message_count,
                "Offering human escalation"
            );
            session.record(TurnRole::Bot, ESCALATION_MESSAGE);
            return TurnResult {
                response: ESCALATION_MESSAGE.to_string(),
                intent: intents::ESCALATION.to_string(),
                sentiment,
                quick_replies: ESCALATION_REPLIES.iter().map(|r| r.to_string()).collect(),
                name: session.name.clone(),
                session_id,
            };
        }

        let classifier = self.classifier();
        let catalog = classifier.catalog();
        let intent = classifier.classify(message).intent;
        let response = self.responder.respond(catalog, &intent, &mut session, message);

        session.last_intent = Some(intent.clone());
        session.record(TurnRole::Bot, &response);

        tracing::debug!(
            session_id = %session_id,
            intent = %intent,
            sentiment = %sentiment,
            message_count = session.message_count,
            "Processed turn"
        );

        TurnResult {
            quick_replies: self.quick_replies.lookup(catalog, &intent),
            response,
            intent,
            sentiment,
            name: session.name.clone(),
            session_id,
        }
    }

    /// Log and metadata for a session; empty for unknown ids
    pub fn history(&self, session_id: &str) -> SessionHistory {
        let session_id = self.resolve_session_id(session_id);
        self.sessions
            .get(&session_id)
            .map(|session| session.history())
            .unwrap_or_default()
    }

    /// Drop a session; returns whether it existed
    pub fn clear(&self, session_id: &str) -> bool {
        let session_id = self.resolve_session_id(session_id);
        self.sessions.clear(&session_id)
    }

    /// Swap in a new catalog; turns already in flight finish on the old one
    pub fn reload_catalog(&self, catalog: IntentCatalog) {
        let classifier = IntentClassifier::new(Arc::new(catalog));
        tracing::info!(intents = classifier.catalog().len(), "Reloaded intent catalog");
        *self.classifier.write() = Arc::new(classifier);
    }

    /// Load a catalog file and swap it in; the current catalog stays on error
    pub fn reload_catalog_from<P: AsRef<Path>>(&self, path: P) -> Result<usize, AgentError> {
        let catalog = IntentCatalog::load(path)?;
        let intents = catalog.len();
        self.reload_catalog(catalog);
        Ok(intents)
    }

    pub fn catalog(&self) -> Arc<IntentCatalog> {
        self.classifier().catalog().clone()
    }

    pub fn session_count(&self) -> usize {
        self.sessions.count()
    }

    fn classifier(&self) -> Arc<IntentClassifier> {
        self.classifier.read().clone()
    }

    /// Blank ids map to the default session; others are used verbatim
    fn resolve_session_id(&self, session_id: &str) -> String {
        if session_id.trim().is_empty() {
            self.default_session_id.clone()
        } else {
            session_id.to_string()
        }
    }
}

impl Default for SupportAgent {
    fn default() -> Self {
        Self::new(
            IntentCatalog::builtin(),
            &DialogueConfig::default(),
            &BrandConfig::default(),
        )
    }
}

impl std::fmt::Debug for SupportAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupportAgent")
            .field("sessions", &self.sessions.count())
            .field("escalation_threshold", &self.escalation_threshold)
            .field("default_session_id", &self.default_session_id)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use support_agent_core::SentimentError;

    struct FailingScorer;

    impl SentimentScorer for FailingScorer {
        fn score(&self, _text: &str) -> Result<Sentiment, SentimentError> {
            Err(SentimentError::Unavailable("offline".to_string()))
        }
    }

    fn agent() -> SupportAgent {
        SupportAgent::default().with_rng(StdRng::seed_from_u64(42))
    }

    #[test]
    fn test_turn_logs_both_sides() {
        let agent = agent();
        let result = agent.process_turn("s1", "hello");

        assert_eq!(result.intent, "greeting");
        assert_eq!(result.session_id, "s1");

        let history = agent.history("s1");
        assert_eq!(history.history.len(), 2);
        assert_eq!(history.history[0].role, TurnRole::User);
        assert_eq!(history.history[0].message, "hello");
        assert_eq!(history.history[1].role, TurnRole::Bot);
        assert_eq!(history.history[1].message, result.response);
    }

    #[test]
    fn test_blank_session_id_uses_default() {
        let agent = agent();
        let result = agent.process_turn("  ", "hello");
        assert_eq!(result.session_id, "default");
        assert_eq!(agent.history("default").history.len(), 2);
    }

    #[test]
    fn test_session_ids_are_not_normalized() {
        let agent = agent();
        agent.process_turn("web-1", "hello");
        let result = agent.process_turn(" web-1", "hello");

        assert_eq!(result.session_id, " web-1");
        assert_eq!(agent.session_count(), 2);
        assert_eq!(agent.history("web-1").history.len(), 2);
        assert_eq!(agent.history(" web-1").history.len(), 2);
    }

    #[test]
    fn test_scorer_failure_is_neutral() {
        let agent = agent().with_sentiment_scorer(Arc::new(FailingScorer));
        for _ in 0..5 {
            let result = agent.process_turn("s1", "this is awful");
            assert_eq!(result.sentiment, Sentiment::Neutral);
            assert!(!result.is_escalation());
        }
    }

    #[test]
    fn test_last_intent_tracked() {
        let sessions = Arc::new(InMemorySessionStore::new());
        let agent = agent().with_session_store(sessions.clone());

        agent.process_turn("s1", "I want a refund");
        assert_eq!(sessions.get("s1").unwrap().last_intent.as_deref(), Some("return"));

        agent.process_turn("s1", "order #123456");
        let session = sessions.get("s1").unwrap();
        assert_eq!(session.last_intent.as_deref(), Some("order_tracking"));
        assert_eq!(session.last_order.as_deref(), Some("123456"));
        assert_eq!(agent.session_count(), 1);
    }

    #[test]
    fn test_reload_catalog() {
        let agent = agent();
        assert_eq!(agent.process_turn("s1", "what are your hours").intent, "default");

        let catalog = IntentCatalog::from_definitions(vec![
            support_agent_config::IntentDefinition::new("hours", &["hours"], &["9 to 5."]),
        ])
        .unwrap();
        agent.reload_catalog(catalog);

        let result = agent.process_turn("s1", "what are your hours");
        assert_eq!(result.intent, "hours");
        assert_eq!(result.response, "9 to 5.");
        assert_eq!(agent.catalog().len(), 2);
    }

    #[test]
    fn test_reload_from_missing_file_keeps_catalog() {
        let agent = agent();
        let before = agent.catalog();
        assert!(agent.reload_catalog_from("/nonexistent/catalog.json").is_err());
        assert_eq!(*agent.catalog(), *before);
    }

    #[test]
    fn test_turn_result_serialization() {
        let agent = agent();
        let result = agent.process_turn("s1", "my name is Sam");
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["intent"], "name_intro");
        assert_eq!(json["sentiment"], "neutral");
        assert_eq!(json["name"], "Sam");
        assert_eq!(json["session_id"], "s1");
        assert!(json["quick_replies"].is_array());
    }
}
