//! Centralized constants for the support agent
//!
//! Single source of truth for intent names and default values used across
//! the workspace.

/// Intent names with engine-level meaning
pub mod intents {
    /// Fallback intent; every catalog carries it
    pub const DEFAULT: &str = "default";
    pub const GREETING: &str = "greeting";
    /// Resolved when a name introduction is extracted
    pub const NAME_INTRO: &str = "name_intro";
    /// Resolved when an order reference is extracted
    pub const ORDER_TRACKING: &str = "order_tracking";
    /// Reported for turns answered by the human hand-off offer
    pub const ESCALATION: &str = "escalation";

    /// Intents matched with whole-word subset semantics, in this order
    pub const PRIORITY: &[&str] = &["return", "refund", "shipping", "payment", "contact"];

    /// Substrings that mark a message as a greeting when nothing else matched
    pub const GREETING_KEYWORDS: &[&str] = &["hello", "hi", "hey", "greetings"];
}

/// Dialogue policy defaults
pub mod dialogue {
    /// Escalation is offered once the session has seen more than this many messages
    pub const ESCALATION_THRESHOLD: usize = 3;

    /// Chance of prefixing a response with the customer's name
    pub const PERSONALIZATION_PROBABILITY: f64 = 0.5;

    /// Session id used when the client does not supply one
    pub const DEFAULT_SESSION_ID: &str = "default";

    /// Catalog file read at startup
    pub const CATALOG_PATH: &str = "responses.json";
}

/// Sentiment scoring defaults
pub mod sentiment {
    /// Polarity magnitude above which a message is positive or negative
    pub const POLARITY_THRESHOLD: f32 = 0.3;
}

/// Company information used in responses and quick replies
pub mod brand {
    pub const COMPANY_NAME: &str = "Your Company";
    pub const BOT_NAME: &str = "SupportBot";
    pub const SUPPORT_EMAIL: &str = "support@yourcompany.com";
    pub const SUPPORT_PHONE: &str = "1-800-123-4567";
}

/// Server defaults
pub mod server {
    pub const DEFAULT_HOST: &str = "0.0.0.0";
    pub const DEFAULT_PORT: u16 = 5000;
    pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
}
