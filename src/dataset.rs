use crate::dto::ScoredRecord;
use crate::error::AnalysisError;
use crate::preprocess::{PRODUCT_COLUMN, TIMESTAMP_COLUMN};
use chrono::Datelike;
use serde::Serialize;
use std::collections::HashSet;

///
/// Scored reviews in input order, plus which optional columns the source carried.
///
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    records: Vec<ScoredRecord>,
    has_product: bool,
    has_timestamp: bool,
}

/// Distinct products and years present in a dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionOptions<'a> {
    pub products: Vec<&'a str>,
    pub years: Vec<i32>,
}

impl Dataset {
    pub fn new(records: Vec<ScoredRecord>, has_product: bool, has_timestamp: bool) -> Self {
        Dataset {
            records,
            has_product,
            has_timestamp,
        }
    }

    pub fn records(&self) -> &[ScoredRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_product(&self) -> bool {
        self.has_product
    }

    pub fn has_timestamp(&self) -> bool {
        self.has_timestamp
    }

    /// Distinct product names in first-seen order.
    pub fn products(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.records
            .iter()
            .filter_map(ScoredRecord::product)
            .filter(|product| seen.insert(*product))
            .collect()
    }

    /// Distinct review years, newest first.
    pub fn years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self
            .records
            .iter()
            .filter_map(|record| record.review.timestamp.map(|ts| ts.year()))
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        years.sort_unstable_by(|a, b| b.cmp(a));
        years
    }

    /// Choices a caller can offer for product- and year-parameterized questions.
    pub fn options(&self) -> SelectionOptions<'_> {
        SelectionOptions {
            products: self.products(),
            years: self.years(),
        }
    }

    pub(crate) fn require_product(&self) -> Result<(), AnalysisError> {
        if self.has_product {
            Ok(())
        } else {
            Err(AnalysisError::missing_field(PRODUCT_COLUMN))
        }
    }

    pub(crate) fn require_timestamp(&self) -> Result<(), AnalysisError> {
        if self.has_timestamp {
            Ok(())
        } else {
            Err(AnalysisError::missing_field(TIMESTAMP_COLUMN))
        }
    }
}
