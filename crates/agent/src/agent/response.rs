//! Response generation
//!
//! Entity-bearing intents answer from fixed templates and record the entity
//! on the session. Every other intent draws uniformly from its catalog
//! responses, falling back to the `default` pool, with `{brand.*}`
//! placeholders filled in. Responses to a named customer may then be
//! prefixed with their name.

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use support_agent_config::constants::intents;
use support_agent_config::{
    BrandConfig, IntentCatalog, PersonalizationConfig, PersonalizationMode,
};
use support_agent_text_processing::{extract_name, extract_order_number};

use crate::session::Session;

/// Offered instead of a normal answer when a frustrated customer keeps going
pub const ESCALATION_MESSAGE: &str =
    "I notice you seem frustrated. Would you like me to connect you with a human agent? 🤝";

fn name_greeting(name: &str) -> String {
    format!("Nice to meet you, {}! 🎉 How can I help you today?", name)
}

fn order_status(order_number: &str) -> String {
    format!(
        "Let me check order #{} for you... 📦 It's currently being processed and will ship within 2 business days.",
        order_number
    )
}

/// Lower-case only the first character
fn lowercase_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Produces the bot's answer for a classified message
pub struct ResponseGenerator {
    rng: Mutex<StdRng>,
    personalization: PersonalizationConfig,
    brand: BrandConfig,
}

impl ResponseGenerator {
    pub fn new(personalization: PersonalizationConfig, brand: BrandConfig) -> Self {
        Self::with_rng(personalization, brand, StdRng::from_entropy())
    }

    /// Use a caller-supplied random source, e.g. a seeded one in tests
    pub fn with_rng(
        personalization: PersonalizationConfig,
        brand: BrandConfig,
        rng: StdRng,
    ) -> Self {
        Self {
            rng: Mutex::new(rng),
            personalization,
            brand,
        }
    }

    pub fn personalization(&self) -> &PersonalizationConfig {
        &self.personalization
    }

    pub fn brand(&self) -> &BrandConfig {
        &self.brand
    }

    /// Generate the response for `intent`, recording extracted entities on the session
    pub fn respond(
        &self,
        catalog: &IntentCatalog,
        intent: &str,
        session: &mut Session,
        message: &str,
    ) -> String {
        match intent {
            intents::NAME_INTRO => {
                if let Some(name) = extract_name(message) {
                    let response = name_greeting(&name);
                    session.name = Some(name);
                    return response;
                }
            },
            intents::ORDER_TRACKING => {
                if let Some(order_number) = extract_order_number(message) {
                    let response = order_status(&order_number);
                    session.last_order = Some(order_number);
                    return response;
                }
            },
            _ => {},
        }

        let response = self.brand.substitute(&self.pick(catalog, intent));
        match session.name.as_deref() {
            Some(name) if self.should_personalize() => {
                format!("{}, {}", name, lowercase_first(&response))
            },
            _ => response,
        }
    }

    fn pick(&self, catalog: &IntentCatalog, intent: &str) -> String {
        let definition = catalog
            .get(intent)
            .filter(|def| !def.is_default() && !def.responses.is_empty())
            .unwrap_or_else(|| catalog.default_intent());

        let mut rng = self.rng.lock();
        definition
            .responses
            .choose(&mut *rng)
            .cloned()
            .unwrap_or_default()
    }

    fn should_personalize(&self) -> bool {
        match self.personalization.mode {
            PersonalizationMode::Always => true,
            PersonalizationMode::Never => false,
            PersonalizationMode::Random => {
                self.rng.lock().gen::<f64>() < self.personalization.probability
            },
        }
    }
}
