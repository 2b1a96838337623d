//! Core types and traits for the support agent
//!
//! This crate provides the types shared by every other crate:
//! - Conversation log entries (`Turn`, `TurnRole`)
//! - Sentiment labels and the pluggable `SentimentScorer` contract

pub mod conversation;
pub mod sentiment;

pub use conversation::{Turn, TurnRole};
pub use sentiment::{Sentiment, SentimentError, SentimentScorer};
