use crate::dataset::Dataset;
use crate::dto::ScoredRecord;
use crate::export::export_scores;
use crate::preprocess::ReviewTable;
use crate::sentiment::SentimentAnalyzer;
use rayon::prelude::*;
use std::path::Path;
use tracing::{debug, warn};

///
/// Scores every review and derives its category. Records are scored in
/// parallel; the returned dataset keeps the table's row order.
///
pub fn score(analyzer: &SentimentAnalyzer, table: ReviewTable) -> Dataset {
    let has_product = table.has_product();
    let has_timestamp = table.has_timestamp();
    let records: Vec<ScoredRecord> = table
        .into_records()
        .into_par_iter()
        .map(|review| {
            let compound = analyzer.compound(&review.text);
            ScoredRecord::new(review, compound)
        })
        .collect();
    debug!(records = records.len(), "scored reviews");
    Dataset::new(records, has_product, has_timestamp)
}

///
/// Scores the table, then writes the score column to `path`. A failed
/// export is logged and the scored dataset is returned regardless.
///
pub fn score_and_export<P: AsRef<Path>>(
    analyzer: &SentimentAnalyzer,
    table: ReviewTable,
    path: P,
) -> Dataset {
    let dataset = score(analyzer, table);
    if let Err(err) = export_scores(&dataset, path.as_ref()) {
        warn!(path = %path.as_ref().display(), error = %err.msg, "score export failed");
    }
    dataset
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::{ReviewRecord, SentimentCategory};
    use crate::export::read_scores;
    use std::fs::File;

    fn table(texts: &[&str]) -> ReviewTable {
        let records = texts
            .iter()
            .map(|text| ReviewRecord {
                product: Some(String::from("Widget")),
                text: text.to_string(),
                rating: 3,
                timestamp: None,
            })
            .collect();
        ReviewTable::new(records, true, false)
    }

    #[test]
    fn scores_keep_input_order() {
        let texts: Vec<String> = (0..200)
            .map(|i| if i % 2 == 0 { "great".into() } else { "terrible".into() })
            .collect();
        let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
        let dataset = score(&SentimentAnalyzer::new(), table(&refs));
        assert_eq!(dataset.len(), 200);
        for (i, record) in dataset.records().iter().enumerate() {
            let expected = if i % 2 == 0 {
                SentimentCategory::Positive
            } else {
                SentimentCategory::Negative
            };
            assert_eq!(record.category(), expected);
        }
    }

    #[test]
    fn export_failure_does_not_abort_scoring() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("scores.csv");
        let dataset = score_and_export(&SentimentAnalyzer::new(), table(&["ok", "bad"]), &path);
        assert_eq!(dataset.len(), 2);
        assert!(!path.exists());
    }

    #[test]
    fn export_writes_one_row_per_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.csv");
        let dataset = score_and_export(
            &SentimentAnalyzer::new(),
            table(&["great product", "terrible", "ok", "arrived tuesday"]),
            &path,
        );
        let scores = read_scores(File::open(&path).unwrap()).unwrap();
        let expected: Vec<f64> = dataset.records().iter().map(ScoredRecord::score).collect();
        assert_eq!(scores, expected);
        assert_eq!(scores, vec![0.6249, -0.4767, 0.296, 0.0]);
    }
}
