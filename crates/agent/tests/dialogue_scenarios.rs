//! End-to-end dialogue scenarios through the support agent

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::Write;
use std::sync::Arc;

use support_agent_agent::{
    InMemorySessionStore, SessionStore, SupportAgent, ESCALATION_MESSAGE,
};
use support_agent_config::{BrandConfig, DialogueConfig, IntentCatalog, PersonalizationMode};
use support_agent_core::{Sentiment, SentimentError, SentimentScorer, TurnRole};

/// Always reports the same label
struct FixedScorer(Sentiment);

impl SentimentScorer for FixedScorer {
    fn score(&self, _text: &str) -> Result<Sentiment, SentimentError> {
        Ok(self.0)
    }
}

const STORE_CATALOG: &str = r#"{
    "greeting": {
        "patterns": ["hello", "hi", "hey"],
        "responses": ["Hello! How can I help you today?"]
    },
    "hours": {
        "patterns": ["hours", "open", "close"],
        "responses": ["We're open Monday to Friday, 9 AM to 6 PM."]
    },
    "return": {
        "patterns": ["return", "refund", "send back"],
        "responses": ["You can return items within 30 days."]
    },
    "shipping": {
        "patterns": ["shipping", "delivery"],
        "responses": ["Standard shipping takes 3-5 business days."]
    },
    "thanks": {
        "patterns": ["thank", "thanks"],
        "responses": ["You're welcome!"]
    },
    "default": {
        "responses": ["I'm not sure about that. Can you rephrase?"]
    }
}"#;

fn store_catalog() -> IntentCatalog {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    file.write_all(STORE_CATALOG.as_bytes()).unwrap();
    IntentCatalog::load(file.path()).unwrap()
}

fn never_personalize() -> DialogueConfig {
    let mut dialogue = DialogueConfig::default();
    dialogue.personalization.mode = PersonalizationMode::Never;
    dialogue
}

fn agent_with(sentiment: Sentiment) -> (SupportAgent, Arc<InMemorySessionStore>) {
    let sessions = Arc::new(InMemorySessionStore::new());
    let agent = SupportAgent::new(store_catalog(), &never_personalize(), &BrandConfig::default())
        .with_session_store(sessions.clone())
        .with_sentiment_scorer(Arc::new(FixedScorer(sentiment)))
        .with_rng(StdRng::seed_from_u64(2024));
    (agent, sessions)
}

#[test]
fn test_name_introduction() {
    let (agent, sessions) = agent_with(Sentiment::Neutral);
    let result = agent.process_turn("web-1", "my name is Sam");

    assert_eq!(result.intent, "name_intro");
    assert!(result.response.contains("Sam"));
    assert_eq!(result.name.as_deref(), Some("Sam"));
    assert_eq!(sessions.get("web-1").unwrap().name.as_deref(), Some("Sam"));
}

#[test]
fn test_order_tracking() {
    let (agent, sessions) = agent_with(Sentiment::Neutral);
    let result = agent.process_turn("web-1", "track order #123456");

    assert_eq!(result.intent, "order_tracking");
    assert!(result.response.contains("123456"));
    assert_eq!(sessions.get("web-1").unwrap().last_order.as_deref(), Some("123456"));
}

#[test]
fn test_greeting_on_fresh_session() {
    let (agent, _) = agent_with(Sentiment::Neutral);
    let result = agent.process_turn("fresh", "hello");

    assert_eq!(result.intent, "greeting");
    assert_eq!(
        result.quick_replies,
        vec!["Store hours", "Return policy", "Shipping info", "Contact us"]
    );
    assert!(result.name.is_none());
}

#[test]
fn test_escalation_after_three_messages() {
    let (agent, sessions) = agent_with(Sentiment::Negative);

    // Counts 1 to 3 are not beyond the threshold
    for message in ["hello", "what are your hours", "shipping cost"] {
        let result = agent.process_turn("web-1", message);
        assert!(!result.is_escalation());
        assert_eq!(result.sentiment, Sentiment::Negative);
    }

    // A name introduction on the fourth message is never classified
    let result = agent.process_turn("web-1", "my name is Sam");
    assert_eq!(
        result.response,
        "I notice you seem frustrated. Would you like me to connect you with a human agent? 🤝"
    );
    assert_eq!(result.quick_replies, vec!["Yes please", "No thanks", "Continue chat"]);
    assert_eq!(result.intent, "escalation");
    assert!(result.name.is_none());

    let session = sessions.get("web-1").unwrap();
    assert_eq!(session.message_count, 4);
    assert!(session.name.is_none());
    assert_eq!(session.last_intent.as_deref(), Some("shipping"));

    // The escalation offer is logged like any other bot message
    let last = session.messages.last().unwrap();
    assert_eq!(last.role, TurnRole::Bot);
    assert_eq!(last.message, ESCALATION_MESSAGE);
    assert_eq!(session.messages.len(), 8);
}

#[test]
fn test_escalation_keeps_known_name() {
    let (agent, _) = agent_with(Sentiment::Negative);
    agent.process_turn("web-1", "my name is Sam");
    agent.process_turn("web-1", "hello");
    agent.process_turn("web-1", "hello");

    let result = agent.process_turn("web-1", "hello");
    assert!(result.is_escalation());
    assert_eq!(result.name.as_deref(), Some("Sam"));
}

#[test]
fn test_no_escalation_without_negative_sentiment() {
    let (agent, _) = agent_with(Sentiment::Positive);
    for _ in 0..10 {
        assert!(!agent.process_turn("web-1", "thanks").is_escalation());
    }
}

#[test]
fn test_message_count_matches_user_turns() {
    let (agent, sessions) = agent_with(Sentiment::Neutral);
    let messages = ["hello", "my name is Sam", "when do you open", "order #55555", "thanks", "?"];
    for message in messages {
        agent.process_turn("web-1", message);
    }

    let session = sessions.get("web-1").unwrap();
    assert_eq!(session.message_count, messages.len());
    assert_eq!(session.user_turns(), messages.len());
    assert_eq!(session.messages.len(), messages.len() * 2);
    for (i, turn) in session.messages.iter().enumerate() {
        let expected = if i % 2 == 0 { TurnRole::User } else { TurnRole::Bot };
        assert_eq!(turn.role, expected);
    }
}

#[test]
fn test_catalog_order_and_fallbacks() {
    let (agent, _) = agent_with(Sentiment::Neutral);

    let result = agent.process_turn("web-1", "are you closed on sunday");
    assert_eq!(result.intent, "hours");
    assert_eq!(result.quick_replies[0], "Weekend hours");

    let result = agent.process_turn("web-1", "blorp");
    assert_eq!(result.intent, "default");
    assert_eq!(result.response, "I'm not sure about that. Can you rephrase?");
}

#[test]
fn test_clear_then_history_is_empty() {
    let (agent, _) = agent_with(Sentiment::Neutral);
    agent.process_turn("web-1", "hello");
    assert_eq!(agent.history("web-1").history.len(), 2);

    assert!(agent.clear("web-1"));
    let history = agent.history("web-1");
    assert!(history.is_empty());
    assert_eq!(
        serde_json::to_value(&history).unwrap(),
        serde_json::json!({"history": [], "session_data": {}})
    );

    // Clearing again is not an error
    assert!(!agent.clear("web-1"));

    // The next turn starts a fresh session
    agent.process_turn("web-1", "hello");
    assert_eq!(agent.history("web-1").session_data.unwrap().message_count, 1);
}

#[test]
fn test_history_metadata() {
    let (agent, _) = agent_with(Sentiment::Neutral);
    agent.process_turn("web-1", "i'm alex");
    agent.process_turn("web-1", "thanks");

    let json = serde_json::to_value(agent.history("web-1")).unwrap();
    assert_eq!(json["session_data"]["name"], "Alex");
    assert_eq!(json["session_data"]["message_count"], 2);
    assert_eq!(json["history"].as_array().unwrap().len(), 4);
    assert_eq!(json["history"][2]["message"], "thanks");
}

#[test]
fn test_sessions_do_not_share_state() {
    let (agent, _) = agent_with(Sentiment::Neutral);
    agent.process_turn("a", "my name is Sam");
    let result = agent.process_turn("b", "hello");

    assert!(result.name.is_none());
    assert_eq!(agent.session_count(), 2);
}

#[test]
fn test_concurrent_sessions() {
    let (agent, sessions) = agent_with(Sentiment::Neutral);
    let agent = Arc::new(agent);

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let agent = agent.clone();
            std::thread::spawn(move || {
                let id = format!("session-{}", i);
                for _ in 0..20 {
                    agent.process_turn(&id, "hello");
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(sessions.count(), 4);
    for i in 0..4 {
        let session = sessions.get(&format!("session-{}", i)).unwrap();
        assert_eq!(session.message_count, 20);
        assert_eq!(session.messages.len(), 40);
    }
}
