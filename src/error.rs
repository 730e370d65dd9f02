use serde::{Deserialize, Serialize};
use serde_json;
use std::error;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    /// Input could not be read as delimited text, or a typed field failed to parse
    Parse,
    /// A required column is absent after header normalization
    Validation,
    /// A query needs a column this dataset does not carry
    MissingField,
    /// A single-answer query found no rows to choose from
    NoData,
    Internal,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AnalysisError {
    pub msg: String,
    pub kind: ErrorKind,
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let json = serde_json::to_string_pretty(&self).map_err(|_| fmt::Error)?;
        write!(f, "{}", json)
    }
}

impl error::Error for AnalysisError {}

impl AnalysisError {
    fn new<T: fmt::Display>(msg: T, kind: ErrorKind) -> AnalysisError {
        AnalysisError {
            msg: msg.to_string(),
            kind,
        }
    }

    pub fn parse<T: fmt::Display>(msg: T) -> AnalysisError {
        Self::new(msg, ErrorKind::Parse)
    }

    pub fn validation<T: fmt::Display>(msg: T) -> AnalysisError {
        Self::new(msg, ErrorKind::Validation)
    }

    pub fn missing_field(field: &str) -> AnalysisError {
        Self::new(
            format!("column '{}' not found in the uploaded data", field),
            ErrorKind::MissingField,
        )
    }

    pub fn no_data<T: fmt::Display>(msg: T) -> AnalysisError {
        Self::new(msg, ErrorKind::NoData)
    }

    pub fn internal<T: fmt::Display>(msg: T) -> AnalysisError {
        Self::new(msg, ErrorKind::Internal)
    }
}
