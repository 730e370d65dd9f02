use crate::dto::ReviewRecord;
use crate::error::AnalysisError;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord, Writer};
use std::collections::HashSet;
use std::io::{Read, Write};
use tracing::debug;

pub const TEXT_COLUMN: &str = "sentiments";
pub const RATING_COLUMN: &str = "ratings";
pub const PRODUCT_COLUMN: &str = "productname";
pub const TIMESTAMP_COLUMN: &str = "timestamp";

const PRODUCT_ALIASES: [&str; 3] = [PRODUCT_COLUMN, "product_name", "product"];
const TIMESTAMP_ALIASES: [&str; 2] = [TIMESTAMP_COLUMN, "timestamps"];

/// Field values treated as absent, in addition to the empty string.
const NA_VALUES: [&str; 17] = [
    "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "NULL", "null", "None", "#N/A", "#NA",
    "<NA>", "-1.#IND", "1.#QNAN", "-1.#QNAN", "#N/A N/A",
];

const DATETIME_FORMATS: [&str; 5] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %H:%M:%S%.f",
];
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];
/// `%.f` writes nothing for whole seconds.
const TIMESTAMP_OUTPUT_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

///
/// The cleaned, unscored review table. Rows keep their input order.
///
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewTable {
    records: Vec<ReviewRecord>,
    has_product: bool,
    has_timestamp: bool,
}

impl ReviewTable {
    pub fn new(records: Vec<ReviewRecord>, has_product: bool, has_timestamp: bool) -> Self {
        ReviewTable {
            records,
            has_product,
            has_timestamp,
        }
    }

    pub fn records(&self) -> &[ReviewRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<ReviewRecord> {
        self.records
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

    ///
    /// Writes the table back out with canonical column names. Feeding the
    /// output to [`preprocess`] yields an identical table.
    ///
    pub fn write_csv<W: Write>(&self, sink: W) -> Result<(), AnalysisError> {
        let mut writer = Writer::from_writer(sink);
        let mut header = Vec::with_capacity(4);
        if self.has_product {
            header.push(PRODUCT_COLUMN);
        }
        header.extend([TEXT_COLUMN, RATING_COLUMN]);
        if self.has_timestamp {
            header.push(TIMESTAMP_COLUMN);
        }
        writer
            .write_record(&header)
            .map_err(AnalysisError::internal)?;
        for record in &self.records {
            let mut row = Vec::with_capacity(header.len());
            if let Some(product) = &record.product {
                row.push(product.clone());
            }
            row.push(record.text.clone());
            row.push(record.rating.to_string());
            if let Some(timestamp) = record.timestamp {
                row.push(timestamp.format(TIMESTAMP_OUTPUT_FORMAT).to_string());
            }
            writer.write_record(&row).map_err(AnalysisError::internal)?;
        }
        writer.flush().map_err(AnalysisError::internal)
    }
}

/// Column positions resolved from the normalized header row.
struct Schema {
    text: usize,
    rating: usize,
    product: Option<usize>,
    timestamp: Option<usize>,
}

impl Schema {
    fn resolve(headers: &[String]) -> Result<Self, AnalysisError> {
        let position = |names: &[&str]| {
            names
                .iter()
                .find_map(|name| headers.iter().position(|h| h == name))
        };
        let text = position(&[TEXT_COLUMN]).ok_or_else(|| {
            AnalysisError::validation(format!("The CSV file must have a '{TEXT_COLUMN}' column."))
        })?;
        let rating = position(&[RATING_COLUMN]).ok_or_else(|| {
            AnalysisError::validation(format!(
                "The CSV file must have a '{RATING_COLUMN}' column."
            ))
        })?;
        Ok(Schema {
            text,
            rating,
            product: position(&PRODUCT_ALIASES),
            timestamp: position(&TIMESTAMP_ALIASES),
        })
    }

    fn parse_row(&self, row: &StringRecord) -> Result<ReviewRecord, AnalysisError> {
        let line = row.position().map_or(0, |p| p.line());
        let field = |idx: usize| row.get(idx).unwrap_or_default();
        let rating = parse_rating(field(self.rating)).ok_or_else(|| {
            AnalysisError::parse(format!(
                "line {line}: rating '{}' is not a whole number",
                field(self.rating)
            ))
        })?;
        let timestamp = match self.timestamp {
            Some(idx) => Some(parse_timestamp(field(idx)).ok_or_else(|| {
                AnalysisError::parse(format!(
                    "line {line}: unable to parse timestamp '{}'",
                    field(idx)
                ))
            })?),
            None => None,
        };
        Ok(ReviewRecord {
            product: self.product.map(|idx| field(idx).to_string()),
            text: field(self.text).to_string(),
            rating,
            timestamp,
        })
    }
}

///
/// Loads delimited review data and cleans it.
///
/// Exact-duplicate rows are dropped (first occurrence kept), then every row
/// with a missing value in any column is dropped, including columns the
/// pipeline never reads. Headers are trimmed and lowercased before the
/// required `sentiments` and `ratings` columns are checked.
///
pub fn preprocess<R: Read>(source: R) -> Result<ReviewTable, AnalysisError> {
    let mut reader = ReaderBuilder::new().flexible(true).from_reader(source);
    let headers: Vec<String> = reader
        .headers()
        .map_err(|err| AnalysisError::parse(format!("Error processing file: {err}")))?
        .iter()
        .map(normalize_header)
        .collect();
    if headers.iter().all(String::is_empty) {
        return Err(AnalysisError::parse(
            "Error processing file: no columns to parse from file",
        ));
    }
    let width = headers.len();
    let rows = reader
        .records()
        .collect::<Result<Vec<StringRecord>, _>>()
        .map_err(|err| AnalysisError::parse(format!("Error processing file: {err}")))?;
    if let Some(row) = rows.iter().find(|row| row.len() > width) {
        return Err(AnalysisError::parse(format!(
            "Error processing file: line {} has {} fields, expected {width}",
            row.position().map_or(0, |p| p.line()),
            row.len()
        )));
    }
    let total = rows.len();

    let unique = drop_duplicates(rows);
    let deduplicated = unique.len();
    let complete: Vec<StringRecord> = unique
        .into_iter()
        .filter(|row| row.len() == width && !row.iter().any(is_missing))
        .collect();

    let schema = Schema::resolve(&headers)?;
    let records = complete
        .iter()
        .map(|row| schema.parse_row(row))
        .collect::<Result<Vec<_>, _>>()?;
    debug!(
        total,
        duplicates = total - deduplicated,
        incomplete = deduplicated - records.len(),
        kept = records.len(),
        "preprocessed review data"
    );
    Ok(ReviewTable::new(
        records,
        schema.product.is_some(),
        schema.timestamp.is_some(),
    ))
}

fn normalize_header(name: &str) -> String {
    name.trim().to_lowercase()
}

fn drop_duplicates(rows: Vec<StringRecord>) -> Vec<StringRecord> {
    let mut seen: HashSet<Vec<String>> = HashSet::with_capacity(rows.len());
    rows.into_iter()
        .filter(|row| seen.insert(row.iter().map(String::from).collect()))
        .collect()
}

fn is_missing(value: &str) -> bool {
    value.is_empty() || NA_VALUES.contains(&value)
}

fn parse_rating(value: &str) -> Option<i64> {
    let value = value.trim();
    if let Ok(rating) = value.parse::<i64>() {
        return Some(rating);
    }
    let rating = value.parse::<f64>().ok()?;
    if rating.is_finite() && rating.fract() == 0.0 {
        Some(rating as i64)
    } else {
        None
    }
}

fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_local());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}
