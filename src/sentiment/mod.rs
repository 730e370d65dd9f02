//! Lexicon-based polarity scoring for review text.

mod analyzer;

pub use analyzer::SentimentAnalyzer;
