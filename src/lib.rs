//! Sentiment scoring and product analytics over customer review data.
//!
//! The pipeline runs in one direction: [`preprocess`] cleans raw CSV into a
//! [`ReviewTable`], [`score`] attaches a compound polarity and category to
//! every review, and [`query::run`] answers one of the thirteen questions in
//! [`Query::catalog`].

pub mod dataset;
pub mod dto;
pub mod error;
pub mod export;
pub mod preprocess;
pub mod query;
pub mod response;
pub mod scoring;
pub mod sentiment;
pub mod util;

pub use dataset::{Dataset, SelectionOptions};
pub use dto::{ReviewRecord, ScoredRecord, SentimentCategory, TimeGranularity};
pub use error::{AnalysisError, ErrorKind};
pub use export::{export_scores, read_scores, write_scores, SCORE_EXPORT_FILE};
pub use preprocess::{preprocess, ReviewTable};
pub use query::{Query, QueryOutcome, QueryResult};
pub use scoring::{score, score_and_export};
pub use sentiment::SentimentAnalyzer;
