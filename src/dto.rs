use crate::query::Query;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Compound scores strictly above this are Positive.
pub const POSITIVE_THRESHOLD: f64 = 0.05;
/// Compound scores strictly below this are Negative.
pub const NEGATIVE_THRESHOLD: f64 = -0.05;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DataFile {
    pub bucket: String,
    pub key: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    pub data: DataFile,
    pub query: Query,
}

/// One cleaned row of review input.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct ReviewRecord {
    /// `None` only when the whole dataset has no product column
    pub product: Option<String>,
    pub text: String,
    pub rating: i64,
    pub timestamp: Option<NaiveDateTime>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
pub enum SentimentCategory {
    Positive,
    Negative,
    Neutral,
}

impl SentimentCategory {
    pub const ALL: [SentimentCategory; 3] = [
        SentimentCategory::Positive,
        SentimentCategory::Negative,
        SentimentCategory::Neutral,
    ];

    /// Thresholds are exclusive: exactly 0.05 or -0.05 is Neutral.
    pub fn from_score(score: f64) -> Self {
        if score > POSITIVE_THRESHOLD {
            SentimentCategory::Positive
        } else if score < NEGATIVE_THRESHOLD {
            SentimentCategory::Negative
        } else {
            SentimentCategory::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentCategory::Positive => "Positive",
            SentimentCategory::Negative => "Negative",
            SentimentCategory::Neutral => "Neutral",
        }
    }
}

/// A review with its compound score. The category is derived from the
/// score at construction and cannot be set on its own.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScoredRecord {
    #[serde(flatten)]
    pub review: ReviewRecord,
    sentiment_score: f64,
    sentiment_category: SentimentCategory,
}

impl ScoredRecord {
    pub fn new(review: ReviewRecord, sentiment_score: f64) -> Self {
        ScoredRecord {
            review,
            sentiment_score,
            sentiment_category: SentimentCategory::from_score(sentiment_score),
        }
    }

    pub fn score(&self) -> f64 {
        self.sentiment_score
    }

    pub fn category(&self) -> SentimentCategory {
        self.sentiment_category
    }

    pub fn product(&self) -> Option<&str> {
        self.review.product.as_deref()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeGranularity {
    #[default]
    Year,
    Month,
    Day,
}

impl TimeGranularity {
    pub fn label(&self) -> &'static str {
        match self {
            TimeGranularity::Year => "Year",
            TimeGranularity::Month => "Month",
            TimeGranularity::Day => "Day",
        }
    }
}
