use crate::dataset::Dataset;
use crate::error::AnalysisError;
use csv::{Reader, Writer};
use serde::Deserialize;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// Default file name of the side-channel score export.
pub const SCORE_EXPORT_FILE: &str = "sentiment_scores.csv";
pub const SCORE_COLUMN: &str = "sentiment_score";

#[derive(Deserialize)]
struct ScoreRow {
    sentiment_score: f64,
}

/// Writes a `sentiment_score` header and one score per record, in dataset order.
pub fn write_scores<W: Write>(dataset: &Dataset, sink: W) -> Result<(), AnalysisError> {
    let mut writer = Writer::from_writer(sink);
    writer
        .write_record([SCORE_COLUMN])
        .map_err(AnalysisError::internal)?;
    for record in dataset.records() {
        writer
            .write_record([record.score().to_string()])
            .map_err(AnalysisError::internal)?;
    }
    writer.flush().map_err(AnalysisError::internal)
}

pub fn export_scores(dataset: &Dataset, path: &Path) -> Result<(), AnalysisError> {
    let file = File::create(path).map_err(|err| {
        AnalysisError::internal(format!("Unable to create {}: {err}", path.display()))
    })?;
    write_scores(dataset, file)
}

pub fn read_scores<R: Read>(source: R) -> Result<Vec<f64>, AnalysisError> {
    Reader::from_reader(source)
        .deserialize::<ScoreRow>()
        .map(|row| {
            row.map(|ScoreRow { sentiment_score }| sentiment_score)
                .map_err(AnalysisError::parse)
        })
        .collect()
}
