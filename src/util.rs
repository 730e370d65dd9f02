use crate::dto::DataFile;
use crate::error::AnalysisError;
use futures::stream::TryStreamExt;
use rusoto_core::Region;
use rusoto_s3::{GetObjectRequest, PutObjectRequest, S3Client, S3};
use std::env;
use std::str::FromStr;

const INPUT_PREFIX: &str = "/input";
const OUTPUT_PREFIX: &str = "/output";
const CSV_CONTENT_TYPE: &str = "text/csv";

/// Region from `REGION`, falling back to the `AWS_REGION` the Lambda runtime sets.
pub fn get_region() -> Result<Region, AnalysisError> {
    let name = get_env_var("REGION")
        .or_else(|_| get_env_var("AWS_REGION"))
        .map_err(|_| AnalysisError::internal("Neither 'REGION' nor 'AWS_REGION' is set"))?;
    parse_region(&name)
}

fn parse_region(name: &str) -> Result<Region, AnalysisError> {
    Region::from_str(name.trim())
        .map_err(|_| AnalysisError::internal(format!("Unable to parse region '{}'", name)))
}

pub fn get_env_var(name: &str) -> Result<String, AnalysisError> {
    env::var(name).map_err(|_| {
        AnalysisError::internal(format!("Environment variable '{}' not found", name))
    })
}

///
/// Where a derived file for `source` is written: same key scheme, with the
/// bucket's `/input` prefix swapped for `/output`.
///
pub fn output_location(source: &DataFile, key: &str) -> DataFile {
    DataFile {
        bucket: source.bucket.replacen(INPUT_PREFIX, OUTPUT_PREFIX, 1),
        key: key.to_string(),
    }
}

/// Reads the uploaded review file named by `file`.
pub async fn download_review_file(
    client: &S3Client,
    file: &DataFile,
) -> Result<Vec<u8>, AnalysisError> {
    let request = GetObjectRequest {
        bucket: file.bucket.clone(),
        key: file.key.clone(),
        ..Default::default()
    };
    let mut object = client.get_object(request).await.map_err(|err| {
        AnalysisError::internal(format!(
            "Unable to fetch s3://{}/{}: {}",
            file.bucket, file.key, err
        ))
    })?;
    let body = object
        .body
        .take()
        .ok_or_else(|| AnalysisError::internal(format!("Object {} has no body", file.key)))?;
    body.map_ok(|b| b.to_vec())
        .try_concat()
        .await
        .map_err(AnalysisError::internal)
}

/// Writes a CSV body to `file`.
pub async fn upload_csv(
    client: &S3Client,
    body: Vec<u8>,
    file: &DataFile,
) -> Result<(), AnalysisError> {
    let request = PutObjectRequest {
        bucket: file.bucket.clone(),
        key: file.key.clone(),
        body: Some(body.into()),
        content_type: Some(String::from(CSV_CONTENT_TYPE)),
        ..Default::default()
    };
    client
        .put_object(request)
        .await
        .map(|_| ())
        .map_err(|err| {
            AnalysisError::internal(format!(
                "Unable to write s3://{}/{}: {}",
                file.bucket, file.key, err
            ))
        })
}
