use serde::{de, Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;

use crate::error::{AnalysisError, ErrorKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Ok,
    BadRequest,
    NotFound,
    InternalServerError,
}

impl Status {
    fn code(&self) -> u16 {
        match self {
            Status::Ok => 200,
            Status::BadRequest => 400,
            Status::NotFound => 404,
            Status::InternalServerError => 500,
        }
    }
}

impl From<ErrorKind> for Status {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::Parse | ErrorKind::Validation | ErrorKind::MissingField => {
                Status::BadRequest
            }
            ErrorKind::NoData => Status::NotFound,
            ErrorKind::Internal => Status::InternalServerError,
        }
    }
}

impl Serialize for Status {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u16(self.code())
    }
}

struct StatusCodeVisitor;

impl<'de> de::Visitor<'de> for StatusCodeVisitor {
    type Value = Status;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("Status")
    }

    fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        match v {
            200 => Ok(Status::Ok),
            400 => Ok(Status::BadRequest),
            404 => Ok(Status::NotFound),
            500 => Ok(Status::InternalServerError),
            value => Err(de::Error::custom(value.to_string())),
        }
    }
}

impl<'de> de::Deserialize<'de> for Status {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_u16(StatusCodeVisitor)
    }
}

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponsePayload {
    pub status_code: Status,
    pub headers: Value,
    pub body: Value,
}

pub fn make_response_payload(
    result: Result<Value, AnalysisError>,
) -> Result<Value, lambda_runtime::Error> {
    let headers = json!({
        "Content-Type": "application/json",
        "Access-Control-Allow-Origin": "*"
    });
    let response_payload = match result {
        Err(err) => ResponsePayload {
            status_code: err.kind.into(),
            headers,
            body: Value::String(err.msg),
        },
        Ok(body) => ResponsePayload {
            status_code: Status::Ok,
            headers,
            body,
        },
    };
    serde_json::to_value(response_payload).map_err(lambda_runtime::Error::from)
}
