//! Lexicon-based sentiment scoring
//!
//! Polarity is the mean of the scores of the polar words in a message, in
//! [-1.0, 1.0]. A negator up to two words before a polar word flips and halves
//! it; an intensifier directly before scales it. The polarity is mapped to a
//! [`Sentiment`] label with a symmetric threshold.

use once_cell::sync::Lazy;
use std::collections::HashMap;
use unicode_segmentation::UnicodeSegmentation;

use support_agent_config::constants::sentiment::POLARITY_THRESHOLD;
use support_agent_core::{Sentiment, SentimentError, SentimentScorer};

static LEXICON: Lazy<HashMap<&'static str, f32>> = Lazy::new(|| {
    [
        // Positive
        ("good", 0.7),
        ("great", 0.8),
        ("excellent", 1.0),
        ("awesome", 1.0),
        ("amazing", 0.6),
        ("love", 0.5),
        ("loved", 0.7),
        ("like", 0.3),
        ("happy", 0.8),
        ("glad", 0.5),
        ("pleased", 0.5),
        ("wonderful", 1.0),
        ("fantastic", 0.9),
        ("perfect", 1.0),
        ("nice", 0.6),
        ("helpful", 0.5),
        ("best", 1.0),
        ("fast", 0.2),
        ("quick", 0.33),
        ("easy", 0.43),
        ("thanks", 0.2),
        ("thank", 0.2),
        ("appreciate", 0.5),
        ("satisfied", 0.5),
        // Negative
        ("bad", -0.7),
        ("terrible", -1.0),
        ("awful", -1.0),
        ("horrible", -1.0),
        ("worst", -1.0),
        ("hate", -0.8),
        ("angry", -0.5),
        ("annoyed", -0.6),
        ("annoying", -0.6),
        ("frustrated", -0.7),
        ("frustrating", -0.7),
        ("useless", -0.5),
        ("disappointed", -0.75),
        ("disappointing", -0.6),
        ("poor", -0.4),
        ("broken", -0.4),
        ("stupid", -0.8),
        ("wrong", -0.5),
        ("damaged", -0.5),
        ("late", -0.3),
        ("slow", -0.3),
        ("ridiculous", -0.33),
        ("unacceptable", -0.8),
        ("never", -0.1),
        ("missing", -0.2),
        ("problem", -0.3),
    ]
    .into_iter()
    .collect()
});

static NEGATORS: &[&str] = &[
    "not", "no", "never", "don't", "doesn't", "isn't", "wasn't", "can't", "won't", "didn't",
];

static INTENSIFIERS: Lazy<HashMap<&'static str, f32>> = Lazy::new(|| {
    [
        ("very", 1.3),
        ("really", 1.3),
        ("so", 1.3),
        ("extremely", 1.5),
        ("totally", 1.4),
        ("absolutely", 1.4),
    ]
    .into_iter()
    .collect()
});

/// How far back a negator reaches
const NEGATION_WINDOW: usize = 2;
const NEGATION_FACTOR: f32 = -0.5;

/// Word-lexicon sentiment analyzer
#[derive(Debug, Clone)]
pub struct LexiconSentimentAnalyzer {
    threshold: f32,
}

impl Default for LexiconSentimentAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl LexiconSentimentAnalyzer {
    pub fn new() -> Self {
        Self {
            threshold: POLARITY_THRESHOLD,
        }
    }

    /// Override the label threshold (polarity strictly beyond ±threshold)
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold.abs();
        self
    }

    /// Polarity of a message in [-1.0, 1.0]; 0.0 when no polar word is present
    pub fn polarity(&self, text: &str) -> f32 {
        let tokens: Vec<String> = text.unicode_words().map(|w| w.to_lowercase()).collect();

        let mut total = 0.0f32;
        let mut count = 0usize;

        for (i, token) in tokens.iter().enumerate() {
            let Some(&base) = LEXICON.get(token.as_str()) else {
                continue;
            };
            let mut score = base;

            if i > 0 {
                if let Some(&factor) = INTENSIFIERS.get(tokens[i - 1].as_str()) {
                    score *= factor;
                }
            }

            let window_start = i.saturating_sub(NEGATION_WINDOW);
            if tokens[window_start..i]
                .iter()
                .any(|t| NEGATORS.contains(&t.as_str()))
            {
                score *= NEGATION_FACTOR;
            }

            total += score.clamp(-1.0, 1.0);
            count += 1;
        }

        if count == 0 {
            return 0.0;
        }

        (total / count as f32).clamp(-1.0, 1.0)
    }
}

impl SentimentScorer for LexiconSentimentAnalyzer {
    fn score(&self, text: &str) -> Result<Sentiment, SentimentError> {
        let polarity = self.polarity(text);
        let sentiment = Sentiment::from_polarity(polarity, self.threshold);
        tracing::trace!(polarity, sentiment = sentiment.as_str(), "Scored message");
        Ok(sentiment)
    }
}
