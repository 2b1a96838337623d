//! Sentiment labels and the scorer contract
//!
//! The dialogue engine only consumes a three-way label. How the label is
//! computed is up to the implementation behind [`SentimentScorer`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coarse sentiment of a single message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    #[default]
    Neutral,
    Negative,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Neutral => "neutral",
            Sentiment::Negative => "negative",
        }
    }

    /// Map a polarity in [-1, 1] to a label using a symmetric threshold
    pub fn from_polarity(polarity: f32, threshold: f32) -> Self {
        if polarity > threshold {
            Sentiment::Positive
        } else if polarity < -threshold {
            Sentiment::Negative
        } else {
            Sentiment::Neutral
        }
    }

    pub fn is_negative(&self) -> bool {
        matches!(self, Sentiment::Negative)
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Failure inside a scorer. Callers degrade to [`Sentiment::Neutral`].
#[derive(Error, Debug)]
pub enum SentimentError {
    #[error("Scorer unavailable: {0}")]
    Unavailable(String),

    #[error("Scoring failed: {0}")]
    Failed(String),
}

/// Scores the sentiment of a message
pub trait SentimentScorer: Send + Sync {
    fn score(&self, text: &str) -> Result<Sentiment, SentimentError>;
}
